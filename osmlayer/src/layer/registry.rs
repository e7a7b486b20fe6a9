//! Minimum zoom registry shared by all layers attached to one map view.
//!
//! Each attached layer registers the zoom level below which it stops loading
//! data. The indicator derived from the registry tells the user which zoom
//! level shows everything.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Placeholder replaced by the current zoom in [`IndicatorMessages::template`].
pub const CURRENT_ZOOM_TOKEN: &str = "CURRENTZOOM";
/// Placeholder replaced by the effective minimum in [`IndicatorMessages::template`].
pub const MIN_ZOOM_TOKEN: &str = "MINZOOMLEVEL";

static NEXT_LAYER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a layer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(u64);

impl LayerId {
    /// Allocate a fresh, process-unique id.
    pub fn next() -> Self {
        Self(NEXT_LAYER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer#{}", self.0)
    }
}

/// Texts shown by the minimum zoom indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorMessages {
    /// Shown when no layer is registered.
    pub no_layer: String,
    /// Shown otherwise, with [`CURRENT_ZOOM_TOKEN`] and [`MIN_ZOOM_TOKEN`] substituted.
    pub template: String,
}

impl Default for IndicatorMessages {
    fn default() -> Self {
        Self {
            no_layer: "no layer assigned".to_string(),
            template: format!(
                "current Zoom-Level: {} all data at Level: {}",
                CURRENT_ZOOM_TOKEN, MIN_ZOOM_TOKEN
            ),
        }
    }
}

/// What the indicator should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorState {
    /// False once the map is zoomed in far enough for every layer.
    pub visible: bool,
    /// Indicator text.
    pub text: String,
}

/// Registered layers and their minimum zoom levels.
#[derive(Debug, Default)]
pub struct MinZoomRegistry {
    layers: HashMap<LayerId, u8>,
}

impl MinZoomRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a layer, replacing any previous entry for it.
    pub fn register(&mut self, layer: LayerId, min_zoom: u8) {
        self.layers.insert(layer, min_zoom);
    }

    /// Remove a layer. Returns false if it was not registered.
    pub fn unregister(&mut self, layer: LayerId) -> bool {
        self.layers.remove(&layer).is_some()
    }

    /// True when the layer is registered.
    pub fn contains(&self, layer: LayerId) -> bool {
        self.layers.contains_key(&layer)
    }

    /// Number of registered layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// True when no layer is registered.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Zoom level at which every registered layer loads data.
    ///
    /// This is the largest registered minimum, or `None` with no layers.
    pub fn effective_min_zoom(&self) -> Option<u8> {
        self.layers.values().copied().max()
    }

    /// Indicator state for the given zoom.
    pub fn indicator(&self, current_zoom: u8, messages: &IndicatorMessages) -> IndicatorState {
        match self.effective_min_zoom() {
            None => IndicatorState {
                visible: false,
                text: messages.no_layer.clone(),
            },
            Some(min_zoom) => IndicatorState {
                visible: current_zoom < min_zoom,
                text: messages
                    .template
                    .replace(CURRENT_ZOOM_TOKEN, &current_zoom.to_string())
                    .replace(MIN_ZOOM_TOKEN, &min_zoom.to_string()),
            },
        }
    }
}
