//! Overpass map layer
//!
//! An [`OverpassLayer`] attaches to a host map view through the [`MapHost`]
//! trait. While attached it registers its minimum zoom in the host's
//! [`MinZoomRegistry`] and, on each viewport change, loads the tiles it has
//! not loaded yet and draws new elements as points.
//!
//! # Example
//!
//! ```ignore
//! use osmlayer::layer::{LayerConfig, OverpassLayer};
//! use osmlayer::overpass::ReqwestClient;
//!
//! let config = LayerConfig::default().with_min_zoom(14);
//! let client = ReqwestClient::with_timeout(config.request_timeout_secs)?;
//! let mut layer = OverpassLayer::new(config, client);
//!
//! let report = layer.attach(&mut map).await;
//! // ... after every pan or zoom
//! let report = layer.on_viewport_settle(&mut map).await;
//! ```
//!
//! Hosts that must stay responsive while requests are in flight plan the
//! batch and poll it themselves:
//!
//! ```ignore
//! if let Some(mut batch) = layer.begin_viewport_settle(&map).into_batch() {
//!     while let Some(response) = batch.next_response().await {
//!         layer.merge_response(&mut map, response);
//!     }
//! }
//! ```

mod batch;
mod config;
mod engine;
pub mod host;
mod observer;
mod reducer;
mod registry;

pub use batch::{BatchId, Refresh, TileBatch, TileResponse};

pub use config::{
    LayerConfig, DEFAULT_ENDPOINT, DEFAULT_MIN_ZOOM, DEFAULT_QUERY, DEFAULT_UNINTERESTING_TAGS,
};
pub use engine::OverpassLayer;
pub use host::{MapHost, RenderSink};
pub use observer::{BatchObserver, BatchReport, BatchStatus, LoggingObserver};
pub use reducer::{DrawNewElements, ResponseReducer};
pub use registry::{
    IndicatorMessages, IndicatorState, LayerId, MinZoomRegistry, CURRENT_ZOOM_TOKEN,
    MIN_ZOOM_TOKEN,
};
