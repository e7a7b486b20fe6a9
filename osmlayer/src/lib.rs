//! OsmLayer - Overpass API data layers for slippy maps
//!
//! This library loads OpenStreetMap data from the Overpass API for whatever a
//! host map view shows, tile by tile, and hands each element to the host for
//! drawing. It also parses OSM XML documents into a typed feature graph.
//!
//! # Modules
//!
//! - [`coord`]: Web Mercator tile math
//! - [`osm`]: OSM XML feature graph and way classification
//! - [`overpass`]: query templates, HTTP client seam, response model
//! - [`tiling`]: viewport decomposition, request ledger, batch accounting
//! - [`layer`]: the attachable layer and its host contract
//! - [`config`]: INI configuration file
//! - [`logging`]: subscriber setup

pub mod config;
pub mod coord;
pub mod layer;
pub mod logging;
pub mod osm;
pub mod overpass;
pub mod tiling;

pub use layer::{
    BatchReport, BatchStatus, LayerConfig, MapHost, OverpassLayer, Refresh, RenderSink, TileBatch,
};
