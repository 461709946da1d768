//! Grid index over a set of elevation tiles.

use crate::{DemError, Tile, C};
use geo::geometry::{Coord, Rect};
use log::{debug, warn};
use std::collections::{hash_map::Entry, HashMap};

/// What to do when two tiles land in the same grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlap {
    /// The tile supplied last replaces earlier ones.
    #[default]
    LastWins,

    /// Fail with [DemError::Overlap].
    Reject,
}

/// Elevation tiles arranged on a regular grid.
///
/// The grid cell size is the size of the largest ("full") tile and
/// the grid origin is the lower-left corner of a full tile. Smaller
/// edge tiles occupy the cell containing their lower-left corner.
#[derive(Debug, Clone)]
pub struct Grid {
    /// Lower-left corner of the reference full tile.
    origin: Coord<C>,

    /// (width, height) of a full tile.
    cell_size: (C, C),

    /// All tiles, in the order they were supplied.
    tiles: Vec<Tile>,

    /// Maps grid cells to an index in `tiles`.
    index: HashMap<Coord<i32>, usize>,
}

impl Grid {
    pub fn builder() -> GridBuilder {
        GridBuilder {
            tiles: Vec::new(),
            overlap: Overlap::default(),
        }
    }

    /// Returns the elevation at `coord`, if any.
    ///
    /// `None` means that either no tile covers `coord`'s grid cell or
    /// the covering sample is a no-data sample.
    pub fn get(&self, coord: Coord<C>) -> Option<C> {
        self.tile(coord).and_then(|tile| tile.get(coord))
    }

    /// Returns the tile occupying `coord`'s grid cell, if any.
    ///
    /// Non-finite coordinates are in no cell.
    pub fn tile(&self, coord: Coord<C>) -> Option<&Tile> {
        if !(coord.x.is_finite() && coord.y.is_finite()) {
            return None;
        }
        self.index
            .get(&self.cell(coord))
            .map(|&idx| &self.tiles[idx])
    }

    /// Returns the union of all tile bounding boxes.
    pub fn extent(&self) -> Rect<C> {
        let mut min = Coord {
            x: C::INFINITY,
            y: C::INFINITY,
        };
        let mut max = Coord {
            x: C::NEG_INFINITY,
            y: C::NEG_INFINITY,
        };
        for bbox in self.tiles.iter().map(Tile::bbox) {
            min.x = min.x.min(bbox.min().x);
            min.y = min.y.min(bbox.min().y);
            max.x = max.x.max(bbox.max().x);
            max.y = max.y.max(bbox.max().y);
        }
        Rect::new(min, max)
    }

    /// Returns the lower-left corner of grid cell (0, 0).
    pub fn origin(&self) -> Coord<C> {
        self.origin
    }

    /// Returns the (width, height) of a grid cell.
    pub fn cell_size(&self) -> (C, C) {
        self.cell_size
    }

    /// Returns all tiles this grid was built from.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Returns the number of occupied grid cells.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.index.len()
    }
}

/// Private API
impl Grid {
    /// Returns the grid cell containing `coord`.
    ///
    /// Cells west or south of the origin have negative indices.
    fn cell(&self, Coord { x, y }: Coord<C>) -> Coord<i32> {
        let (w, h) = self.cell_size;
        #[allow(clippy::cast_possible_truncation)]
        let cell = Coord {
            x: ((x - self.origin.x) / w).floor() as i32,
            y: ((y - self.origin.y) / h).floor() as i32,
        };
        cell
    }
}

pub struct GridBuilder {
    tiles: Vec<Tile>,
    overlap: Overlap,
}

impl GridBuilder {
    #[must_use]
    pub fn tile(mut self, tile: Tile) -> Self {
        self.tiles.push(tile);
        self
    }

    #[must_use]
    pub fn tiles<I: IntoIterator<Item = Tile>>(mut self, tiles: I) -> Self {
        self.tiles.extend(tiles);
        self
    }

    /// How to handle two tiles in one grid cell (defaults to
    /// [Overlap::LastWins]).
    #[must_use]
    pub fn overlap(mut self, overlap: Overlap) -> Self {
        self.overlap = overlap;
        self
    }

    pub fn build(self) -> Result<Grid, DemError> {
        let Self { tiles, overlap } = self;

        let (w, h) = tiles
            .iter()
            .map(Tile::bbox)
            .fold(None, |acc: Option<(C, C)>, bbox| {
                let (w, h) = acc.unwrap_or((C::NEG_INFINITY, C::NEG_INFINITY));
                Some((w.max(bbox.width()), h.max(bbox.height())))
            })
            .ok_or(DemError::NoTiles)?;

        #[allow(clippy::float_cmp)]
        let origin = tiles
            .iter()
            .map(Tile::bbox)
            .find(|bbox| bbox.width() == w && bbox.height() == h)
            .map(|bbox| bbox.min())
            .ok_or(DemError::NoFullTile(w, h))?;

        let mut grid = Grid {
            origin,
            cell_size: (w, h),
            tiles: Vec::with_capacity(tiles.len()),
            index: HashMap::with_capacity(tiles.len()),
        };

        for tile in tiles {
            let cell = grid.cell(tile.sw_corner());
            let idx = grid.tiles.len();
            match grid.index.entry(cell) {
                Entry::Vacant(e) => {
                    e.insert(idx);
                }
                Entry::Occupied(_) if overlap == Overlap::Reject => {
                    return Err(DemError::Overlap(cell));
                }
                Entry::Occupied(mut e) => {
                    warn!("tile at {:?} replaces another in cell {cell:?}", tile.sw_corner());
                    e.insert(idx);
                }
            }
            grid.tiles.push(tile);
        }

        debug!(
            "grid; tiles: {}, cells: {}, cell_size: {:?}, origin: {:?}",
            grid.tiles.len(),
            grid.index.len(),
            grid.cell_size,
            grid.origin
        );

        Ok(grid)
    }
}
