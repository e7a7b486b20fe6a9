//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude)
//! and Web Mercator (slippy map) tile coordinates, plus the bounding box type
//! shared by the feature graph and the viewport tiling engine.

mod types;

pub use types::{
    CoordError, GeoBounds, LatLng, TileCoord, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON,
    MIN_ZOOM,
};

use std::f64::consts::PI;

/// Converts geographic coordinates to tile coordinates.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees (-85.05112878 to 85.05112878)
/// * `lon` - Longitude in degrees (-180.0 to 180.0)
/// * `zoom` - Zoom level (0 to 22)
///
/// # Returns
///
/// A `Result` containing the tile coordinates or an error if inputs are invalid.
/// A longitude of exactly 180.0 maps into the last column.
#[inline]
pub fn to_tile_coords(lat: f64, lon: f64, zoom: u8) -> Result<TileCoord, CoordError> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }

    let last = tiles_per_axis(zoom) - 1;
    let col = (lon_to_tile_col(lon, zoom).floor() as u32).min(last);
    let row = (lat_to_tile_row(lat, zoom).floor() as u32).min(last);

    Ok(TileCoord { row, col, zoom })
}

/// Number of tiles along one axis at `zoom`.
#[inline]
pub fn tiles_per_axis(zoom: u8) -> u32 {
    1u32 << zoom
}

/// Fractional tile column for a longitude. No validation or clamping.
#[inline]
pub fn lon_to_tile_col(lon: f64, zoom: u8) -> f64 {
    let n = 2.0_f64.powi(zoom as i32);
    (lon + 180.0) / 360.0 * n
}

/// Fractional tile row for a latitude. No validation or clamping.
///
/// Uses the Web Mercator projection; rows grow southward.
#[inline]
pub fn lat_to_tile_row(lat: f64, zoom: u8) -> f64 {
    let n = 2.0_f64.powi(zoom as i32);
    let lat_rad = lat * PI / 180.0;
    (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n
}

/// Longitude of the western edge of column `col`.
#[inline]
pub fn tile_col_to_lon(col: u32, zoom: u8) -> f64 {
    let n = 2.0_f64.powi(zoom as i32);
    col as f64 / n * 360.0 - 180.0
}

/// Latitude of the northern edge of row `row`.
#[inline]
pub fn tile_row_to_lat(row: u32, zoom: u8) -> f64 {
    let n = 2.0_f64.powi(zoom as i32);
    let y = row as f64 / n;
    let lat_rad = (PI * (1.0 - 2.0 * y)).sinh().atan();
    lat_rad * 180.0 / PI
}

/// Converts tile coordinates back to geographic coordinates.
///
/// Returns the latitude/longitude of the tile's northwest corner.
#[inline]
pub fn tile_to_lat_lon(tile: &TileCoord) -> (f64, f64) {
    (
        tile_row_to_lat(tile.row, tile.zoom),
        tile_col_to_lon(tile.col, tile.zoom),
    )
}

/// Returns the latitude/longitude of the tile's center.
#[inline]
pub fn tile_to_lat_lon_center(tile: &TileCoord) -> (f64, f64) {
    tile_bounds(tile).center().into_tuple()
}

/// Full geographic extent of a tile, unrounded.
#[inline]
pub fn tile_bounds(tile: &TileCoord) -> GeoBounds {
    GeoBounds {
        south: tile_row_to_lat(tile.row + 1, tile.zoom),
        west: tile_col_to_lon(tile.col, tile.zoom),
        north: tile_row_to_lat(tile.row, tile.zoom),
        east: tile_col_to_lon(tile.col + 1, tile.zoom),
    }
}

/// Rounds `value` to `places` decimal digits (half away from zero).
#[inline]
pub fn round_to(value: f64, places: u32) -> f64 {
    let scale = 10f64.powi(places as i32);
    (value * scale).round() / scale
}

impl LatLng {
    /// Split into a `(lat, lon)` tuple.
    pub fn into_tuple(self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}
