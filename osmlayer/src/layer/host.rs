//! Host view contract.
//!
//! The layer never draws anything itself. Drawing, viewport state and the
//! minimum zoom registry all belong to the host map view, which the layer
//! reaches through these traits.

use crate::coord::{GeoBounds, LatLng};
use crate::osm::{ElementId, TagMap};

use super::registry::MinZoomRegistry;

/// Drawing primitives offered by the host.
pub trait RenderSink {
    /// Draw a point of interest.
    fn render_point(&mut self, position: LatLng, tags: &TagMap, id: &ElementId);

    /// Draw a filled polygon. The ring is not closed explicitly.
    fn render_area(&mut self, boundary: &[LatLng]);

    /// Draw an open path.
    fn render_line(&mut self, path: &[LatLng]);
}

/// A map view that layers attach to.
pub trait MapHost: RenderSink {
    /// Currently visible area.
    fn viewport_bounds(&self) -> GeoBounds;

    /// Current zoom level.
    fn zoom(&self) -> u8;

    /// Registry backing the minimum zoom indicator of this view.
    fn min_zoom_registry(&mut self) -> &mut MinZoomRegistry;
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// Host that records everything it is asked to draw.
    #[derive(Debug, Default)]
    pub struct RecordingHost {
        pub viewport: Option<GeoBounds>,
        pub zoom: u8,
        pub points: Vec<(LatLng, ElementId)>,
        pub areas: Vec<Vec<LatLng>>,
        pub lines: Vec<Vec<LatLng>>,
        pub registry: MinZoomRegistry,
    }

    impl RecordingHost {
        pub fn new(viewport: GeoBounds, zoom: u8) -> Self {
            Self {
                viewport: Some(viewport),
                zoom,
                ..Default::default()
            }
        }
    }

    impl RenderSink for RecordingHost {
        fn render_point(&mut self, position: LatLng, _tags: &TagMap, id: &ElementId) {
            self.points.push((position, id.clone()));
        }

        fn render_area(&mut self, boundary: &[LatLng]) {
            self.areas.push(boundary.to_vec());
        }

        fn render_line(&mut self, path: &[LatLng]) {
            self.lines.push(path.to_vec());
        }
    }

    impl MapHost for RecordingHost {
        fn viewport_bounds(&self) -> GeoBounds {
            self.viewport
                .unwrap_or_else(|| GeoBounds::new(0.0, 0.0, 0.0, 0.0))
        }

        fn zoom(&self) -> u8 {
            self.zoom
        }

        fn min_zoom_registry(&mut self) -> &mut MinZoomRegistry {
            &mut self.registry
        }
    }
}
