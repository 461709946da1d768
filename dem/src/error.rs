use geo::geometry::Coord;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum DemError {
    #[error("no elevation tiles")]
    NoTiles,

    #[error("no tile spans the full {0} x {1} grid cell")]
    NoFullTile(f64, f64),

    #[error("tile has {0} samples, expected {1} x {2}")]
    Dimensions(usize, usize, usize),

    #[error("invalid tile scale {0}")]
    Scale(f64),

    #[error("more than one tile in grid cell {0:?}")]
    Overlap(Coord<i32>),
}
