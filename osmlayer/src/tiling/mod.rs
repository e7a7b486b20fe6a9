//! Request tiling
//!
//! Viewports are split into Web Mercator tiles at a fixed request zoom so that
//! panning only fetches what has not been fetched before. This module holds
//! the grid decomposition, the per-layer request ledger, the set of elements
//! already drawn, and the batch completion counter.
//!
//! # Example
//!
//! ```
//! use osmlayer::coord::GeoBounds;
//! use osmlayer::tiling::{decompose, RequestLedger};
//!
//! let mut ledger = RequestLedger::new();
//! let tiles = decompose(&GeoBounds::new(52.5, 13.4, 52.501, 13.401)).unwrap();
//! assert_eq!(ledger.plan_requests(&tiles).len(), 1);
//! assert!(ledger.plan_requests(&tiles).is_empty());
//! ```

mod batch;
mod grid;
mod ledger;

pub use batch::{BatchProgress, TileOutcome};
pub use grid::{
    decompose, decompose_at, LedgerKey, TileBounds, COORD_PRECISION, MAX_TILES, REQUEST_ZOOM,
};
pub use ledger::{MergeOutcome, RequestLedger, ResultSet};
