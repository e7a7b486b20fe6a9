//! Coordinate and bounding box types.

use std::fmt;

use thiserror::Error;

/// Southern limit of the Web Mercator projection in degrees.
pub const MIN_LAT: f64 = -85.05112878;
/// Northern limit of the Web Mercator projection in degrees.
pub const MAX_LAT: f64 = 85.05112878;
/// Western longitude limit in degrees.
pub const MIN_LON: f64 = -180.0;
/// Eastern longitude limit in degrees.
pub const MAX_LON: f64 = 180.0;
/// Lowest supported zoom level.
pub const MIN_ZOOM: u8 = 0;
/// Highest supported zoom level.
pub const MAX_ZOOM: u8 = 22;

/// Errors from coordinate conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Latitude outside the Web Mercator range.
    #[error("Invalid latitude: {0}")]
    InvalidLatitude(f64),

    /// Longitude outside -180..=180.
    #[error("Invalid longitude: {0}")]
    InvalidLongitude(f64),

    /// Zoom level above [`MAX_ZOOM`].
    #[error("Invalid zoom level: {0}")]
    InvalidZoom(u8),

    /// A NaN or infinite coordinate.
    #[error("Non-finite coordinate in {0}")]
    NonFinite(&'static str),

    /// A bounding box spans more tiles than a single decomposition allows.
    #[error("Bounding box spans {count} tiles, limit is {limit}")]
    TooManyTiles {
        /// Tiles the box would need
        count: u64,
        /// Largest accepted tile count
        limit: usize,
    },
}

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

impl LatLng {
    /// Create a new position.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True when both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

/// Web Mercator tile index.
///
/// - Row increases southward (row 0 touches the northern projection limit)
/// - Col increases eastward (col 0 starts at the antimeridian)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Tile row (Y)
    pub row: u32,
    /// Tile column (X)
    pub col: u32,
    /// Zoom level
    pub zoom: u8,
}

impl TileCoord {
    /// Create a new tile coordinate.
    pub fn new(row: u32, col: u32, zoom: u8) -> Self {
        Self { row, col, zoom }
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.col, self.row)
    }
}

/// Geographic bounding box in degrees.
///
/// Field order follows the Overpass bbox convention: south, west, north, east.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    /// Minimum (southernmost) latitude
    pub south: f64,
    /// Minimum (westernmost) longitude
    pub west: f64,
    /// Maximum (northernmost) latitude
    pub north: f64,
    /// Maximum (easternmost) longitude
    pub east: f64,
}

impl GeoBounds {
    /// Create a new bounding box.
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Create a bounding box from two opposite corners in any order.
    pub fn from_corners(a: LatLng, b: LatLng) -> Self {
        Self {
            south: a.lat.min(b.lat),
            west: a.lon.min(b.lon),
            north: a.lat.max(b.lat),
            east: a.lon.max(b.lon),
        }
    }

    /// Create a bounding box from a single point.
    pub fn from_point(point: LatLng) -> Self {
        Self::new(point.lat, point.lon, point.lat, point.lon)
    }

    /// Expand this bounding box to include a point.
    pub fn expand(&mut self, point: LatLng) {
        self.south = self.south.min(point.lat);
        self.west = self.west.min(point.lon);
        self.north = self.north.max(point.lat);
        self.east = self.east.max(point.lon);
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    /// Get the width of the bounds in degrees.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Get the height of the bounds in degrees.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// True when the point lies inside or on the edge of the bounds.
    pub fn contains(&self, point: LatLng) -> bool {
        (self.south..=self.north).contains(&point.lat)
            && (self.west..=self.east).contains(&point.lon)
    }

    /// True when every edge is a finite number.
    pub fn is_finite(&self) -> bool {
        self.south.is_finite()
            && self.west.is_finite()
            && self.north.is_finite()
            && self.east.is_finite()
    }

    /// The four corners as a ring: NW, SW, SE, NE.
    pub fn corners(&self) -> [LatLng; 4] {
        [
            LatLng::new(self.north, self.west),
            LatLng::new(self.south, self.west),
            LatLng::new(self.south, self.east),
            LatLng::new(self.north, self.east),
        ]
    }

    /// Copy of the bounds with every edge rounded to `places` decimals.
    pub fn rounded(&self, places: u32) -> Self {
        Self {
            south: super::round_to(self.south, places),
            west: super::round_to(self.west, places),
            north: super::round_to(self.north, places),
            east: super::round_to(self.east, places),
        }
    }

    /// Format as an Overpass bbox filter: `south,west,north,east`.
    pub fn to_bbox_string(&self) -> String {
        format!("{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}

impl fmt::Display for GeoBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bbox_string())
    }
}
