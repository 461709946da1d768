//! Road segments with slope.

use crate::{split, HillmapError, C};
use dem::Grid;
use geo::{
    algorithm::{Centroid, EuclideanLength},
    geometry::{Coord, LineString},
};
use log::debug;
use rayon::prelude::*;

/// A short piece of road with the elevation at both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadSegment {
    pub line: LineString<C>,

    /// Length of `line`.
    pub length: C,

    /// Unsigned slope, e.g. `0.02` for 2%.
    pub slope: C,

    /// Elevation at the start of `line`.
    pub el1: C,

    /// Elevation at the end of `line`.
    pub el2: C,
}

impl RoadSegment {
    /// Returns a segment for `line` with elevations from `grid`.
    ///
    /// Returns `None` when the elevation at either end is unavailable
    /// or the slope is not finite (zero-length lines).
    pub fn new(line: LineString<C>, grid: &Grid) -> Option<Self> {
        let (first, last) = (*line.0.first()?, *line.0.last()?);
        let el1 = grid.get(first)?;
        let el2 = grid.get(last)?;
        let length = line.euclidean_length();
        let slope = (el2 - el1).abs() / length;
        slope.is_finite().then_some(Self {
            line,
            length,
            slope,
            el1,
            el2,
        })
    }

    /// Returns the length-weighted center of this segment.
    pub fn centroid(&self) -> Option<Coord<C>> {
        self.line.centroid().map(|p| p.0)
    }
}

/// Splits each of `lines` in pieces of at most `dist_limit` length
/// and returns the pieces with known elevation.
///
/// Output order follows input order.
pub fn segments(
    lines: &[LineString<C>],
    dist_limit: C,
    grid: &Grid,
) -> Result<Vec<RoadSegment>, HillmapError> {
    let now = std::time::Instant::now();

    let pieces: Vec<LineString<C>> = lines
        .par_iter()
        .map(|line| split(line, dist_limit))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .flatten()
        .collect();
    let n_pieces = pieces.len();

    let segments: Vec<RoadSegment> = pieces
        .into_par_iter()
        .filter_map(|line| RoadSegment::new(line, grid))
        .collect();

    debug!(
        "segments; lines: {}, pieces: {}, kept: {}, exec: {:?}",
        lines.len(),
        n_pieces,
        segments.len(),
        now.elapsed()
    );

    Ok(segments)
}
