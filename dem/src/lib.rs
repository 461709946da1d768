//! Planar elevation tiles.
//!
//! A [Tile] is a rectangular height field in already-projected
//! coordinates (e.g. meters). Tiles loaded from a survey usually come
//! in a regular grid; [Grid] reconstructs that grid and answers
//! point elevation queries across all tiles.
//!
//! Sample values use the following sentinel policy:
//!
//! | raw sample        | elevation   |
//! |-------------------|-------------|
//! | `h < -100`        | unavailable |
//! | `-100 <= h < 0`   | `0`         |
//! | `h >= 0`          | `h`         |

mod error;
mod grid;

pub use crate::{
    error::DemError,
    grid::{Grid, GridBuilder, Overlap},
};
use geo::geometry::{Coord, Rect};

/// Base floating point type used for all coordinates and calculations.
pub type C = f64;

/// Samples below this value mark regions without data.
pub const NO_DATA_THRESHOLD: f32 = -100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// Southwest (lower-left) corner of the tile's bounding box.
    ///
    /// Note that this is the outer corner of the SW most sample, not
    /// its center.
    sw_corner: Coord<C>,

    /// Ground distance per sample, in both directions.
    scale: C,

    /// Number of (columns, rows) in this tile.
    dimensions: (usize, usize),

    /// Elevation samples, row-major with row 0 being the northernmost.
    samples: Box<[f32]>,
}

impl Tile {
    /// Returns a tile whose lower-left corner is `sw_corner`.
    pub fn new(
        samples: Vec<f32>,
        dimensions: (usize, usize),
        scale: C,
        sw_corner: Coord<C>,
    ) -> Result<Self, DemError> {
        let (cols, rows) = dimensions;
        if samples.len() != cols * rows || samples.is_empty() {
            return Err(DemError::Dimensions(samples.len(), cols, rows));
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(DemError::Scale(scale));
        }
        Ok(Self {
            sw_corner,
            scale,
            dimensions,
            samples: samples.into_boxed_slice(),
        })
    }

    /// Returns a tile positioned by the center of its upper-left
    /// sample, which is how world files (`.tfw`, `.kew`) locate a
    /// raster.
    pub fn from_upper_left_center(
        samples: Vec<f32>,
        dimensions: (usize, usize),
        scale: C,
        ul_center: Coord<C>,
    ) -> Result<Self, DemError> {
        #[allow(clippy::cast_precision_loss)]
        let height = dimensions.1 as C * scale;
        let sw_corner = Coord {
            x: ul_center.x - 0.5 * scale,
            y: ul_center.y - height + 0.5 * scale,
        };
        Self::new(samples, dimensions, scale, sw_corner)
    }

    /// Returns this tile's bounding box.
    pub fn bbox(&self) -> Rect<C> {
        #[allow(clippy::cast_precision_loss)]
        let ne_corner = Coord {
            x: self.sw_corner.x + self.dimensions.0 as C * self.scale,
            y: self.sw_corner.y + self.dimensions.1 as C * self.scale,
        };
        Rect::new(self.sw_corner, ne_corner)
    }

    /// Returns the lower-left corner of this tile.
    pub fn sw_corner(&self) -> Coord<C> {
        self.sw_corner
    }

    /// Returns ground distance per sample.
    pub fn scale(&self) -> C {
        self.scale
    }

    /// Returns the number of (columns, rows) in this tile.
    pub fn dimensions(&self) -> (usize, usize) {
        self.dimensions
    }

    /// Returns the number of samples in this tile.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns the elevation of the sample nearest to `coord`.
    ///
    /// Coordinates outside the tile are clamped to its edge samples,
    /// so this never fails for lack of coverage. `None` means the
    /// sample is in a no-data region.
    pub fn get(&self, coord: Coord<C>) -> Option<C> {
        let (col, row) = self.coord_to_xy(coord);
        sentinel(self.get_xy((col, row)))
    }

    /// Returns the raw sample at (`col`, `row`), where row 0 is the
    /// northernmost.
    pub fn get_xy(&self, (col, row): (usize, usize)) -> f32 {
        self.samples[self.xy_to_linear_index((col, row))]
    }
}

/// Private API
impl Tile {
    /// Maps `coord` to the (column, row) of the sample covering it,
    /// clamped to this tile.
    fn coord_to_xy(&self, coord: Coord<C>) -> (usize, usize) {
        let (cols, rows) = self.dimensions;
        let col = clamp_cell((coord.x - self.sw_corner.x) / self.scale, cols);
        let row_from_south = clamp_cell((coord.y - self.sw_corner.y) / self.scale, rows);
        (col, rows - 1 - row_from_south)
    }

    fn xy_to_linear_index(&self, (col, row): (usize, usize)) -> usize {
        self.dimensions.0 * row + col
    }
}

/// Floors `offset` (in samples) and clamps it to `[0, len - 1]`.
fn clamp_cell(offset: C, len: usize) -> usize {
    if offset.is_nan() || offset <= 0.0 {
        0
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let cell = offset.floor() as usize;
        cell.min(len - 1)
    }
}

/// Applies the no-data sentinel policy to a raw sample.
fn sentinel(raw: f32) -> Option<C> {
    if raw < NO_DATA_THRESHOLD {
        None
    } else if raw < 0.0 {
        Some(0.0)
    } else {
        Some(C::from(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::{sentinel, Coord, DemError, Tile};

    /// 4 x 3 tile at (100, 200) with scale 10, sample value
    /// `10 * row + col`.
    fn tile() -> Tile {
        let samples = (0..3)
            .flat_map(|row| (0..4).map(move |col| (10 * row + col) as f32))
            .collect();
        Tile::new(samples, (4, 3), 10.0, Coord { x: 100.0, y: 200.0 }).unwrap()
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        assert_eq!(
            Tile::new(vec![0.0; 5], (2, 2), 1.0, Coord { x: 0.0, y: 0.0 }),
            Err(DemError::Dimensions(5, 2, 2))
        );
        assert_eq!(
            Tile::new(vec![0.0; 4], (2, 2), 0.0, Coord { x: 0.0, y: 0.0 }),
            Err(DemError::Scale(0.0))
        );
    }

    #[test]
    fn test_bbox() {
        let bbox = tile().bbox();
        assert_eq!(bbox.min(), Coord { x: 100.0, y: 200.0 });
        assert_eq!(bbox.max(), Coord { x: 140.0, y: 230.0 });
    }

    #[test]
    fn test_from_upper_left_center() {
        let tile =
            Tile::from_upper_left_center(vec![0.0; 6], (3, 2), 2.0, Coord { x: 11.0, y: 23.0 })
                .unwrap();
        assert_eq!(tile.sw_corner(), Coord { x: 10.0, y: 20.0 });
        assert_eq!(tile.bbox().max(), Coord { x: 16.0, y: 24.0 });
    }

    #[test]
    fn test_corners_and_center() {
        let tile = tile();
        // SW
        assert_eq!(tile.get(Coord { x: 100.0, y: 200.0 }), Some(20.0));
        // SE
        assert_eq!(tile.get(Coord { x: 140.0, y: 200.0 }), Some(23.0));
        // NW
        assert_eq!(tile.get(Coord { x: 100.0, y: 230.0 }), Some(0.0));
        // NE
        assert_eq!(tile.get(Coord { x: 140.0, y: 230.0 }), Some(3.0));
        // Center of the middle row, second column.
        assert_eq!(tile.get(Coord { x: 115.0, y: 215.0 }), Some(11.0));
    }

    #[test]
    fn test_out_of_tile_is_clamped() {
        let tile = tile();
        assert_eq!(tile.get(Coord { x: 0.0, y: 0.0 }), Some(20.0));
        assert_eq!(tile.get(Coord { x: 1e6, y: 1e6 }), Some(3.0));
    }

    #[test]
    fn test_sentinel() {
        assert_eq!(sentinel(-150.0), None);
        assert_eq!(sentinel(-100.0), Some(0.0));
        assert_eq!(sentinel(-50.0), Some(0.0));
        assert_eq!(sentinel(0.0), Some(0.0));
        assert_eq!(sentinel(42.0), Some(42.0));
    }

    #[test]
    fn test_no_data_sample() {
        let tile = Tile::new(
            vec![-150.0, -50.0, 42.0, 7.5],
            (2, 2),
            1.0,
            Coord { x: 0.0, y: 0.0 },
        )
        .unwrap();
        assert_eq!(tile.get(Coord { x: 0.5, y: 1.5 }), None);
        assert_eq!(tile.get(Coord { x: 1.5, y: 1.5 }), Some(0.0));
        assert_eq!(tile.get(Coord { x: 0.5, y: 0.5 }), Some(42.0));
        assert_eq!(tile.get(Coord { x: 1.5, y: 0.5 }), Some(7.5));
    }
}
