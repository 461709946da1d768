//! Misery index rasterization.

use crate::{blur::gaussian_blur, HillmapError, RoadSegment, C};
use geo::geometry::{Coord, Rect};
use log::debug;
use misery::MiseryTable;

/// Segments steeper than this are assumed to be DEM artifacts, such
/// as a bridge whose deck is missing from the elevation model.
pub const DEFAULT_MAX_SLOPE: C = 0.25;

/// Pixels need a blurred segment length of at least this many
/// resolutions to get a value.
pub const DEFAULT_MIN_WEIGHT: C = 0.4;

pub const DEFAULT_RESOLUTION: C = 500.0;

pub const DEFAULT_BLUR: C = 2.0;

/// A north-up raster of misery index values.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    /// Outer corner of the NW pixel.
    nw_corner: Coord<C>,

    /// Ground distance per pixel.
    resolution: C,

    /// Number of (columns, rows).
    dimensions: (usize, usize),

    /// Row-major pixel values, row 0 is the northernmost. `None` is
    /// no-data.
    values: Vec<Option<C>>,
}

impl Raster {
    pub fn width(&self) -> usize {
        self.dimensions.0
    }

    pub fn height(&self) -> usize {
        self.dimensions.1
    }

    pub fn resolution(&self) -> C {
        self.resolution
    }

    /// Returns the value at (`col`, `row`), if any.
    pub fn get(&self, (col, row): (usize, usize)) -> Option<C> {
        if col < self.width() && row < self.height() {
            self.values[row * self.width() + col]
        } else {
            None
        }
    }

    /// Returns all pixel values, row-major from the north.
    pub fn values(&self) -> &[Option<C>] {
        &self.values
    }

    /// Returns the area covered by this raster.
    pub fn extent(&self) -> Rect<C> {
        #[allow(clippy::cast_precision_loss)]
        let se_corner = Coord {
            x: self.nw_corner.x + self.width() as C * self.resolution,
            y: self.nw_corner.y - self.height() as C * self.resolution,
        };
        Rect::new(self.nw_corner, se_corner)
    }

    /// Returns the pixel to world affine transform in GDAL order:
    /// `x = t[0] + col * t[1] + row * t[2]`, `y = t[3] + col * t[4] +
    /// row * t[5]`.
    pub fn transform(&self) -> [C; 6] {
        [
            self.nw_corner.x,
            self.resolution,
            0.0,
            self.nw_corner.y,
            0.0,
            -self.resolution,
        ]
    }

    /// Returns the world coordinate of the center of (`col`, `row`).
    pub fn pixel_center(&self, (col, row): (usize, usize)) -> Coord<C> {
        #[allow(clippy::cast_precision_loss)]
        let center = Coord {
            x: self.nw_corner.x + (col as C + 0.5) * self.resolution,
            y: self.nw_corner.y - (row as C + 0.5) * self.resolution,
        };
        center
    }
}

/// Splats road segments onto a raster.
#[derive(Debug, Clone)]
pub struct Compositor {
    /// Lower-left corner of pixel (0, height - 1), a multiple of
    /// `resolution`.
    sw_corner: Coord<C>,
    resolution: C,
    dimensions: (usize, usize),
    blur: C,
    max_slope: C,
    min_weight: C,
    table: MiseryTable,
}

impl Compositor {
    pub fn builder() -> CompositorBuilder {
        CompositorBuilder {
            extent: None,
            table: None,
            resolution: DEFAULT_RESOLUTION,
            blur: DEFAULT_BLUR,
            max_slope: DEFAULT_MAX_SLOPE,
            min_weight: DEFAULT_MIN_WEIGHT,
        }
    }

    /// Returns the number of (columns, rows) of the output raster.
    pub fn dimensions(&self) -> (usize, usize) {
        self.dimensions
    }

    /// Returns the pixel (column, row counted from the south) holding
    /// `coord`, if it is on the raster.
    pub fn pixel(&self, coord: Coord<C>) -> Option<(usize, usize)> {
        let (px, py) = self.scale_pixel(coord);
        let (w, h) = self.dimensions;
        let on_raster = (0..w as i64).contains(&px) && (0..h as i64).contains(&py);
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        let pixel = (px as usize, py as usize);
        on_raster.then_some(pixel)
    }

    /// Returns the misery index raster for `segments`.
    ///
    /// Each segment adds its misery index, weighted by its length, to
    /// the pixel holding its centroid. Both the weighted sum and the
    /// weight are blurred, and pixels with too little weight are left
    /// without data.
    pub fn composite(&self, segments: &[RoadSegment]) -> Raster {
        let now = std::time::Instant::now();
        let (width, height) = self.dimensions;
        let mut weighted = vec![0.0; width * height];
        let mut weight = vec![0.0; width * height];

        let (mut steep, mut outside) = (0_usize, 0_usize);
        for segment in segments {
            if !segment.slope.is_finite() || segment.slope > self.max_slope {
                steep += 1;
                continue;
            }
            let Some((px, py)) = segment.centroid().and_then(|c| self.pixel(c)) else {
                outside += 1;
                continue;
            };
            let mi = self.table.interpolate(segment.slope);
            let idx = (height - 1 - py) * width + px;
            weighted[idx] += mi * segment.length;
            weight[idx] += segment.length;
        }

        gaussian_blur(&mut weighted, width, height, self.blur);
        gaussian_blur(&mut weight, width, height, self.blur);

        let threshold = self.resolution * self.min_weight;
        let values: Vec<Option<C>> = weighted
            .iter()
            .zip(&weight)
            .map(|(&sum, &w)| (w > threshold).then(|| sum / w))
            .collect();

        debug!(
            "raster; {width}x{height}, segments: {}, steep: {steep}, outside: {outside}, \
             no-data: {}, exec: {:?}",
            segments.len(),
            values.iter().filter(|v| v.is_none()).count(),
            now.elapsed()
        );

        #[allow(clippy::cast_precision_loss)]
        let nw_corner = Coord {
            x: self.sw_corner.x,
            y: self.sw_corner.y + height as C * self.resolution,
        };

        Raster {
            nw_corner,
            resolution: self.resolution,
            dimensions: self.dimensions,
            values,
        }
    }
}

/// Private API
impl Compositor {
    #[allow(clippy::cast_possible_truncation)]
    fn scale_pixel(&self, Coord { x, y }: Coord<C>) -> (i64, i64) {
        (
            ((x - self.sw_corner.x) / self.resolution).floor() as i64,
            ((y - self.sw_corner.y) / self.resolution).floor() as i64,
        )
    }
}

pub struct CompositorBuilder {
    extent: Option<Rect<C>>,
    table: Option<MiseryTable>,
    resolution: C,
    blur: C,
    max_slope: C,
    min_weight: C,
}

impl CompositorBuilder {
    /// Area to cover (required).
    #[must_use]
    pub fn extent(mut self, extent: Rect<C>) -> Self {
        self.extent = Some(extent);
        self
    }

    /// Slope to misery index table (required).
    #[must_use]
    pub fn table(mut self, table: MiseryTable) -> Self {
        self.table = Some(table);
        self
    }

    /// Pixel size in ground units (defaults to 500).
    #[must_use]
    pub fn resolution(mut self, resolution: C) -> Self {
        self.resolution = resolution;
        self
    }

    /// Standard deviation of the blur, in pixels (defaults to 2, 0
    /// disables blurring).
    #[must_use]
    pub fn blur(mut self, blur: C) -> Self {
        self.blur = blur;
        self
    }

    /// Segments steeper than this are ignored (defaults to 0.25).
    #[must_use]
    pub fn max_slope(mut self, max_slope: C) -> Self {
        self.max_slope = max_slope;
        self
    }

    /// Minimum blurred weight, as a fraction of the resolution, for a
    /// pixel to get a value (defaults to 0.4).
    #[must_use]
    pub fn min_weight(mut self, min_weight: C) -> Self {
        self.min_weight = min_weight;
        self
    }

    pub fn build(self) -> Result<Compositor, HillmapError> {
        let extent = self.extent.ok_or(HillmapError::Builder("extent"))?;
        let table = self.table.ok_or(HillmapError::Builder("table"))?;
        let resolution = self.resolution;
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(HillmapError::Resolution(resolution));
        }
        if !(self.blur.is_finite() && self.blur >= 0.0) {
            return Err(HillmapError::Blur(self.blur));
        }

        // Align pixels on multiples of the resolution.
        let sw_corner = Coord {
            x: (extent.min().x / resolution).floor() * resolution,
            y: (extent.min().y / resolution).floor() * resolution,
        };

        let mut compositor = Compositor {
            sw_corner,
            resolution,
            dimensions: (0, 0),
            blur: self.blur,
            max_slope: self.max_slope,
            min_weight: self.min_weight,
            table,
        };
        let (px, py) = compositor.scale_pixel(extent.max());
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let dimensions = (px as usize + 1, py as usize + 1);
        compositor.dimensions = dimensions;
        Ok(compositor)
    }
}
