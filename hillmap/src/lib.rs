//! # Hill misery maps
//!
//! `hillmap` turns a road network and a DEM into a raster of how
//! unpleasant the roads in each area are to cycle.
//!
//! The pipeline:
//!
//! 1. [split] road polylines into short pieces.
//! 2. Look up the elevation at both ends of each piece in a
//!    [dem::Grid] to get a [RoadSegment] with a slope ([segments]
//!    does 1 and 2 for many lines at once).
//! 3. Convert slopes to misery indices with a
//!    [misery::MiseryTable].
//! 4. Splat, blur, and mask the segments onto a [Raster] with a
//!    [Compositor].

mod blur;
mod error;
mod raster;
mod segment;
mod split;

pub use crate::{
    blur::gaussian_blur,
    error::HillmapError,
    raster::{
        Compositor, CompositorBuilder, Raster, DEFAULT_BLUR, DEFAULT_MAX_SLOPE,
        DEFAULT_MIN_WEIGHT, DEFAULT_RESOLUTION,
    },
    segment::{segments, RoadSegment},
    split::split,
};
pub use dem::C;
pub use {dem, geo, misery};
