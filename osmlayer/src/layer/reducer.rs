//! Folding responses into a layer's results.

use crate::overpass::OverpassResponse;
use crate::tiling::{MergeOutcome, ResultSet};

use super::host::RenderSink;

/// Folds one decoded Overpass response into the layer's results.
///
/// Called once per successful request, in completion order. Implementations
/// decide what to draw; `results` holds every element drawn since the layer
/// attached.
pub trait ResponseReducer: Send + Sync {
    /// Merge `response` and draw what it adds on `sink`.
    fn reduce(
        &self,
        response: &OverpassResponse,
        results: &mut ResultSet,
        sink: &mut dyn RenderSink,
    ) -> MergeOutcome;
}

/// Draws every element not drawn before as a point.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawNewElements;

impl ResponseReducer for DrawNewElements {
    fn reduce(
        &self,
        response: &OverpassResponse,
        results: &mut ResultSet,
        sink: &mut dyn RenderSink,
    ) -> MergeOutcome {
        results.merge(&response.elements, sink)
    }
}
