//! `tiles` command: show how a bbox splits into request tiles.

use osmlayer::coord::GeoBounds;
use osmlayer::tiling::{decompose_at, TileBounds};

use crate::error::CliError;

/// Run the tiles command.
pub fn run(bbox: &GeoBounds, zoom: u8) -> Result<(), CliError> {
    let tiles = decompose_at(bbox, zoom).map_err(|e| CliError::Config(e.to_string()))?;

    for line in describe(&tiles) {
        println!("{}", line);
    }
    println!();
    println!("{} tiles at zoom {}", tiles.len(), zoom);
    Ok(())
}

/// One line per tile: index and Overpass bbox.
pub fn describe(tiles: &[TileBounds]) -> Vec<String> {
    tiles
        .iter()
        .map(|t| format!("{:<16} {}", t.tile.to_string(), t.bounds.to_bbox_string()))
        .collect()
}
