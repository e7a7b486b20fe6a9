//! Viewport to tile grid decomposition.

use std::fmt;

use crate::coord::{
    lat_to_tile_row, lon_to_tile_col, round_to, tile_bounds, tiles_per_axis, CoordError,
    GeoBounds, TileCoord, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON,
};

/// Zoom level of the request grid.
pub const REQUEST_ZOOM: u8 = 14;

/// Decimal places kept on tile bounds.
pub const COORD_PRECISION: u32 = 6;

/// Slack, in tile units, for viewport edges that sit on a tile boundary.
///
/// Tile bounds are rounded to [`COORD_PRECISION`] decimals. Near the edge of
/// the projection that moves a row boundary by up to 3e-4 of a tile at
/// [`REQUEST_ZOOM`], so the slack has to be larger than that.
const EDGE_EPSILON: f64 = 1e-3;

/// Largest number of tiles a single decomposition returns.
///
/// 64 by 64 tiles, about 1.4 degrees of longitude at [`REQUEST_ZOOM`].
/// Larger boxes fail with [`CoordError::TooManyTiles`] before anything is
/// allocated.
pub const MAX_TILES: usize = 4096;

/// A request tile and its rounded geographic bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileBounds {
    /// Grid index
    pub tile: TileCoord,
    /// Bounds rounded to [`COORD_PRECISION`] decimals
    pub bounds: GeoBounds,
}

impl TileBounds {
    /// Bounds of `tile`, rounded.
    pub fn from_tile(tile: TileCoord) -> Self {
        Self {
            tile,
            bounds: tile_bounds(&tile).rounded(COORD_PRECISION),
        }
    }

    /// Ledger key of this tile.
    pub fn ledger_key(&self) -> LedgerKey {
        LedgerKey::from_bounds(&self.bounds)
    }
}

impl fmt::Display for TileBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.tile, self.bounds)
    }
}

/// Ledger identity of a tile: its west and north edges in micro-degrees.
///
/// At a fixed zoom the west edge is a strictly increasing function of the
/// column and the north edge a strictly decreasing function of the row, and
/// neighbouring edges stay further apart than the rounding step, so the pair
/// identifies exactly one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LedgerKey {
    west: i64,
    north: i64,
}

impl LedgerKey {
    /// Key for rounded bounds.
    pub fn from_bounds(bounds: &GeoBounds) -> Self {
        Self {
            west: micro_degrees(bounds.west),
            north: micro_degrees(bounds.north),
        }
    }

    /// West edge in degrees.
    pub fn west(&self) -> f64 {
        self.west as f64 / 1e6
    }

    /// North edge in degrees.
    pub fn north(&self) -> f64 {
        self.north as f64 / 1e6
    }
}

fn micro_degrees(value: f64) -> i64 {
    (round_to(value, COORD_PRECISION) * 1e6).round() as i64
}

/// Tiles at [`REQUEST_ZOOM`] covering `viewport`.
pub fn decompose(viewport: &GeoBounds) -> Result<Vec<TileBounds>, CoordError> {
    decompose_at(viewport, REQUEST_ZOOM)
}

/// Tiles at `zoom` covering `viewport`.
///
/// Tiles are ordered column by column, west to east, and north to south
/// within a column. Latitudes are clamped to the Web Mercator range and
/// longitudes to -180..=180. An edge lying on a tile boundary does not pull
/// in the neighbouring tile. A box needing more than [`MAX_TILES`] tiles is
/// rejected.
pub fn decompose_at(viewport: &GeoBounds, zoom: u8) -> Result<Vec<TileBounds>, CoordError> {
    if !viewport.is_finite() {
        return Err(CoordError::NonFinite("viewport"));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }

    let west = viewport.west.min(viewport.east).clamp(MIN_LON, MAX_LON);
    let east = viewport.west.max(viewport.east).clamp(MIN_LON, MAX_LON);
    let south = viewport.south.min(viewport.north).clamp(MIN_LAT, MAX_LAT);
    let north = viewport.south.max(viewport.north).clamp(MIN_LAT, MAX_LAT);

    let last = tiles_per_axis(zoom) - 1;
    let first_col = first_index(lon_to_tile_col(west, zoom), last);
    let last_col = last_index(lon_to_tile_col(east, zoom), last).max(first_col);
    // Rows grow southward, so the north edge gives the first row.
    let first_row = first_index(lat_to_tile_row(north, zoom), last);
    let last_row = last_index(lat_to_tile_row(south, zoom), last).max(first_row);

    let cols = u64::from(last_col - first_col) + 1;
    let rows = u64::from(last_row - first_row) + 1;
    let count = cols.checked_mul(rows).unwrap_or(u64::MAX);
    let len = usize::try_from(count)
        .ok()
        .filter(|&len| len <= MAX_TILES)
        .ok_or(CoordError::TooManyTiles {
            count,
            limit: MAX_TILES,
        })?;

    let mut tiles = Vec::with_capacity(len);
    for col in first_col..=last_col {
        for row in first_row..=last_row {
            tiles.push(TileBounds::from_tile(TileCoord::new(row, col, zoom)));
        }
    }
    Ok(tiles)
}

fn first_index(fractional: f64, last: u32) -> u32 {
    ((fractional + EDGE_EPSILON).floor().max(0.0) as u32).min(last)
}

fn last_index(fractional: f64, last: u32) -> u32 {
    (((fractional - EDGE_EPSILON).ceil() - 1.0).max(0.0) as u32).min(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_equal_to_one_tile_yields_that_tile() {
        let tile = TileBounds::from_tile(TileCoord::new(5374, 8801, REQUEST_ZOOM));
        let tiles = decompose(&tile.bounds).unwrap();

        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0], tile);
    }

    #[test]
    fn test_small_viewport_inside_one_tile() {
        let viewport = GeoBounds::new(52.5, 13.4, 52.501, 13.401);
        let tiles = decompose(&viewport).unwrap();

        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].tile, TileCoord::new(5374, 8801, 14));
        assert_eq!(
            tiles[0].bounds.to_bbox_string(),
            "52.49616,13.381348,52.509535,13.40332"
        );
    }

    #[test]
    fn test_column_major_order() {
        // Spans two columns and two rows around the Berlin tile
        let viewport = GeoBounds::new(52.49, 13.39, 52.50, 13.41);
        let tiles = decompose(&viewport).unwrap();

        let indices: Vec<(u32, u32)> = tiles.iter().map(|t| (t.tile.col, t.tile.row)).collect();
        assert_eq!(
            indices,
            vec![(8801, 5374), (8801, 5375), (8802, 5374), (8802, 5375)]
        );
    }

    #[test]
    fn test_adjacent_tiles_share_edges() {
        let viewport = GeoBounds::new(52.50, 13.39, 52.501, 13.41);
        let tiles = decompose(&viewport).unwrap();
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[0].bounds.east, tiles[1].bounds.west);
    }

    #[test]
    fn test_out_of_range_viewport_is_clamped() {
        let viewport = GeoBounds::new(-90.0, -200.0, 90.0, 200.0);
        let tiles = decompose_at(&viewport, 1).unwrap();
        assert_eq!(tiles.len(), 4);
    }

    #[test]
    fn test_swapped_edges_are_normalized() {
        let viewport = GeoBounds::new(52.501, 13.401, 52.5, 13.4);
        assert_eq!(decompose(&viewport).unwrap().len(), 1);
    }

    #[test]
    fn test_non_finite_viewport_is_rejected() {
        let viewport = GeoBounds::new(f64::NAN, 0.0, 1.0, 1.0);
        assert!(matches!(
            decompose(&viewport),
            Err(CoordError::NonFinite(_))
        ));
    }

    #[test]
    fn test_world_at_max_zoom_is_too_many_tiles() {
        let world = GeoBounds::new(-85.0, -180.0, 85.0, 180.0);
        let result = decompose_at(&world, MAX_ZOOM);
        match result {
            Err(CoordError::TooManyTiles { count, limit }) => {
                assert!(count > 1 << 40);
                assert_eq!(limit, MAX_TILES);
            }
            other => panic!("Expected TooManyTiles, got {:?}", other),
        }
    }

    #[test]
    fn test_tile_limit_is_inclusive() {
        // 64 columns by 64 rows at zoom 6 is the whole world
        let world = GeoBounds::new(MIN_LAT, MIN_LON, MAX_LAT, MAX_LON);
        assert_eq!(decompose_at(&world, 6).unwrap().len(), MAX_TILES);
        assert!(matches!(
            decompose_at(&world, 7),
            Err(CoordError::TooManyTiles { count: 16384, .. })
        ));
    }

    #[test]
    fn test_ledger_key_uses_west_and_north() {
        let tile = TileBounds::from_tile(TileCoord::new(5374, 8801, 14));
        let key = tile.ledger_key();
        assert_eq!(key.west(), 13.381348);
        assert_eq!(key.north(), 52.509535);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;
        use std::collections::HashSet;

        proptest! {
            #[test]
            fn test_ledger_keys_unique_across_neighbourhood(
                row in 0u32..16380,
                col in 0u32..16380,
            ) {
                // Every tile in a 4x4 block must have its own key
                let mut keys = HashSet::new();
                for dr in 0..4 {
                    for dc in 0..4 {
                        let tile = TileBounds::from_tile(TileCoord::new(
                            row + dr,
                            col + dc,
                            REQUEST_ZOOM,
                        ));
                        prop_assert!(keys.insert(tile.ledger_key()));
                    }
                }
            }

            #[test]
            fn test_decompose_covers_viewport(
                south in -80.0..80.0_f64,
                west in -179.0..179.0_f64,
                height in 0.0..0.1_f64,
                width in 0.0..0.1_f64,
            ) {
                let viewport = GeoBounds::new(south, west, south + height, west + width);
                let tiles = decompose(&viewport)?;
                prop_assert!(!tiles.is_empty());

                let slack = 1e-4;
                let covered_south = tiles.iter().map(|t| t.bounds.south).fold(f64::MAX, f64::min);
                let covered_north = tiles.iter().map(|t| t.bounds.north).fold(f64::MIN, f64::max);
                let covered_west = tiles.iter().map(|t| t.bounds.west).fold(f64::MAX, f64::min);
                let covered_east = tiles.iter().map(|t| t.bounds.east).fold(f64::MIN, f64::max);
                prop_assert!(covered_south <= viewport.south + slack);
                prop_assert!(covered_north >= viewport.north - slack);
                prop_assert!(covered_west <= viewport.west + slack);
                prop_assert!(covered_east >= viewport.east - slack);
            }

            #[test]
            fn test_tile_bounds_decompose_to_themselves(
                row in 100u32..16000,
                col in 0u32..16383,
            ) {
                let tile = TileBounds::from_tile(TileCoord::new(row, col, REQUEST_ZOOM));
                let tiles = decompose(&tile.bounds)?;
                prop_assert_eq!(tiles, vec![tile]);
            }
        }
    }
}
