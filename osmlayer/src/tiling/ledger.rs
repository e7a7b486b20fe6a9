//! Request ledger and result identity set.
//!
//! Both live for as long as a layer stays attached and are cleared together
//! when it is removed from the map.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::grid::{LedgerKey, TileBounds};
use crate::layer::RenderSink;
use crate::osm::ElementId;
use crate::overpass::Element;

/// Tiles already requested by a layer.
#[derive(Debug, Default)]
pub struct RequestLedger {
    keys: HashSet<LedgerKey>,
}

impl RequestLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `tiles` and return those not requested before, in input order.
    ///
    /// Tiles are recorded when they are planned, not when their response
    /// arrives, so a tile whose request fails is never retried.
    pub fn plan_requests(&mut self, tiles: &[TileBounds]) -> Vec<TileBounds> {
        tiles
            .iter()
            .filter(|tile| self.keys.insert(tile.ledger_key()))
            .copied()
            .collect()
    }

    /// True when `tile` has been requested.
    pub fn contains(&self, tile: &TileBounds) -> bool {
        self.keys.contains(&tile.ledger_key())
    }

    /// Number of requested tiles.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True when nothing has been requested.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Forget every request.
    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

/// Counts from merging one response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Elements drawn for the first time
    pub merged: usize,
    /// Elements already drawn by an earlier response
    pub duplicates: usize,
    /// Elements without a usable position
    pub unplaced: usize,
}

/// Identities of every element drawn by a layer.
#[derive(Debug, Default)]
pub struct ResultSet {
    seen: HashSet<ElementId>,
}

impl ResultSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the elements of one response that have not been drawn yet.
    ///
    /// Duplicates are skipped and the rest of the response is still
    /// processed. Elements without a position are skipped without being
    /// recorded, so a later response that does carry a position can still
    /// draw them.
    pub fn merge<S: RenderSink + ?Sized>(
        &mut self,
        elements: &[Element],
        sink: &mut S,
    ) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();

        for element in elements {
            let id = element.element_id();
            if self.seen.contains(&id) {
                outcome.duplicates += 1;
                continue;
            }

            let Some(position) = element.position() else {
                warn!(element = %id, "Element has no position, skipping");
                outcome.unplaced += 1;
                continue;
            };

            sink.render_point(position, &element.tags, &id);
            self.seen.insert(id);
            outcome.merged += 1;
        }

        debug!(
            merged = outcome.merged,
            duplicates = outcome.duplicates,
            unplaced = outcome.unplaced,
            "Merged response"
        );
        outcome
    }

    /// True when `id` has been drawn.
    pub fn contains(&self, id: &ElementId) -> bool {
        self.seen.contains(id)
    }

    /// Number of drawn elements.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// True when nothing has been drawn.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Forget every drawn element.
    pub fn clear(&mut self) {
        self.seen.clear();
    }
}
