//! Polyline resampling.

use crate::HillmapError;
use geo::{
    algorithm::EuclideanLength,
    geometry::{Coord, LineString},
    CoordFloat,
};
use num_traits::{FromPrimitive, ToPrimitive};
use std::iter::Sum;

/// Splits `line` into lines of at most `dist_limit` length.
///
/// Every vertex of `line` is a vertex of one or two of the returned
/// lines; consecutive lines share their end and start vertex.
///
/// Segments of at least 1.5 × `dist_limit` are first divided into
/// `round(length / dist_limit)` equal parts. Shorter segments are
/// never broken, so a returned line made of a single segment may be
/// up to 1.5 × `dist_limit` long.
pub fn split<T>(line: &LineString<T>, dist_limit: T) -> Result<Vec<LineString<T>>, HillmapError>
where
    T: CoordFloat + FromPrimitive + Sum,
{
    if !(dist_limit.is_finite() && dist_limit > T::zero()) {
        return Err(HillmapError::DistLimit(
            dist_limit.to_f64().unwrap_or(f64::NAN),
        ));
    }
    if line.0.len() < 2 {
        return Err(HillmapError::Line(line.0.len()));
    }

    if line.euclidean_length() <= dist_limit {
        return Ok(vec![line.clone()]);
    }

    let (coords, dists) = presplit(line, dist_limit);

    let mut lines = Vec::new();
    let mut start = 0;
    let mut run = dists[0];
    for (i, &d) in dists.iter().enumerate().skip(1) {
        if run > T::zero() && run + d > dist_limit {
            lines.push(LineString::new(coords[start..=i].to_vec()));
            start = i;
            run = T::zero();
        }
        run = run + d;
    }
    if run > T::zero() {
        lines.push(LineString::new(coords[start..].to_vec()));
    }

    Ok(lines)
}

/// Returns the vertices of `line` with long segments subdivided, and
/// the length of each resulting segment.
fn presplit<T>(line: &LineString<T>, dist_limit: T) -> (Vec<Coord<T>>, Vec<T>)
where
    T: CoordFloat + FromPrimitive,
{
    let threshold = dist_limit * T::from_f64(1.5).unwrap();
    let half = T::from_f64(0.5).unwrap();

    let mut coords = Vec::with_capacity(line.0.len());
    let mut dists = Vec::with_capacity(line.0.len());
    coords.push(line.0[0]);

    for segment in line.lines() {
        let d = segment.euclidean_length();
        if d >= threshold {
            // Round half up, at least 2 given the threshold.
            let n = (d / dist_limit + half).floor().to_usize().unwrap_or(1).max(1);
            let n_t = T::from_usize(n).unwrap();
            let delta = segment.delta();
            for k in 1..n {
                let f = T::from_usize(k).unwrap() / n_t;
                coords.push(segment.start + delta * f);
                dists.push(d / n_t);
            }
            coords.push(segment.end);
            dists.push(d / n_t);
        } else {
            coords.push(segment.end);
            dists.push(d);
        }
    }

    (coords, dists)
}
