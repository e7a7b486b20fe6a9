//! Integration tests for the Overpass layer.
//!
//! These tests drive a layer through a simulated map session:
//! - attach → pan → zoom out → zoom in → detach
//! - duplicate elements across tiles drawn once
//! - several layers sharing one minimum zoom indicator
//!
//! Run with: `cargo test --test overpass_layer`

use std::collections::HashMap;
use std::sync::Mutex;

use osmlayer::coord::{GeoBounds, LatLng};
use osmlayer::layer::{IndicatorMessages, LayerConfig, MapHost, MinZoomRegistry, OverpassLayer};
use osmlayer::osm::{ElementId, TagMap};
use osmlayer::overpass::{AsyncHttpClient, FetchError};
use osmlayer::{BatchStatus, RenderSink};

// ============================================================================
// Helper Functions
// ============================================================================

/// Answers every request with the same body and counts requests.
struct FixedClient {
    body: String,
    requests: Mutex<Vec<String>>,
}

impl FixedClient {
    fn new(body: &str) -> Self {
        Self {
            body: body.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl AsyncHttpClient for FixedClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        Ok(self.body.as_bytes().to_vec())
    }
}

/// Map view that keeps one marker per drawn element.
struct TestMap {
    viewport: GeoBounds,
    zoom: u8,
    markers: HashMap<String, LatLng>,
    draw_calls: usize,
    registry: MinZoomRegistry,
}

impl TestMap {
    fn new(viewport: GeoBounds, zoom: u8) -> Self {
        Self {
            viewport,
            zoom,
            markers: HashMap::new(),
            draw_calls: 0,
            registry: MinZoomRegistry::new(),
        }
    }
}

impl RenderSink for TestMap {
    fn render_point(&mut self, position: LatLng, _tags: &TagMap, id: &ElementId) {
        self.draw_calls += 1;
        self.markers.insert(id.to_string(), position);
    }

    fn render_area(&mut self, _boundary: &[LatLng]) {}

    fn render_line(&mut self, _path: &[LatLng]) {}
}

impl MapHost for TestMap {
    fn viewport_bounds(&self) -> GeoBounds {
        self.viewport
    }

    fn zoom(&self) -> u8 {
        self.zoom
    }

    fn min_zoom_registry(&mut self) -> &mut MinZoomRegistry {
        &mut self.registry
    }
}

const SHOPS: &str = r#"{"elements": [
    {"type": "node", "id": 100, "lat": 52.5, "lon": 13.4, "tags": {"organic": "only"}},
    {"type": "node", "id": 101, "lat": 52.501, "lon": 13.401, "tags": {"second_hand": "yes"}},
    {"type": "way", "id": 100, "center": {"lat": 52.502, "lon": 13.402}, "tags": {"shop": "farm"}}
]}"#;

fn berlin() -> GeoBounds {
    GeoBounds::new(52.49, 13.39, 52.50, 13.41)
}

// ============================================================================
// Integration Tests
// ============================================================================

#[tokio::test]
async fn test_map_session() {
    let mut map = TestMap::new(berlin(), 16);
    let mut layer = OverpassLayer::new(LayerConfig::default(), FixedClient::new(SHOPS));

    // Attach loads four tiles; every tile returns the same three elements
    let report = layer.attach(&mut map).await;
    assert_eq!(report.status, BatchStatus::Completed);
    assert_eq!(report.queued, 4);
    assert_eq!(report.merged, 3);
    assert_eq!(map.draw_calls, 3);
    assert!(map.markers.contains_key("node/100"));
    assert!(map.markers.contains_key("way/100"));

    // Pan east by one column
    map.viewport = GeoBounds::new(52.49, 13.41, 52.50, 13.43);
    let report = layer.on_viewport_settle(&mut map).await;
    assert_eq!((report.queued, report.skipped, report.merged), (2, 2, 0));

    // Zoom out below the minimum: nothing is requested
    map.zoom = 12;
    map.viewport = GeoBounds::new(52.3, 13.0, 52.7, 13.8);
    let report = layer.on_viewport_settle(&mut map).await;
    assert_eq!(report.status, BatchStatus::BelowMinZoom);
    assert_eq!(layer.client_requests(), 6);

    // Back to the first view: everything was requested before
    map.zoom = 16;
    map.viewport = berlin();
    let report = layer.on_viewport_settle(&mut map).await;
    assert_eq!(report.status, BatchStatus::AlreadyRequested);
    assert_eq!(report.skipped, 4);

    layer.detach(&mut map);
    assert!(map.registry.is_empty());
    assert_eq!(layer.requested_tiles(), 0);
    assert_eq!(map.draw_calls, 3);
}

#[tokio::test]
async fn test_layers_share_one_indicator() {
    let mut map = TestMap::new(berlin(), 14);
    let mut shops = OverpassLayer::new(LayerConfig::default(), FixedClient::new(SHOPS));
    let mut benches = OverpassLayer::new(
        LayerConfig::default()
            .with_query("node(BBOX)[amenity=bench];out qt;")
            .with_min_zoom(13),
        FixedClient::new(SHOPS),
    );

    let messages = IndicatorMessages::default();
    assert_eq!(map.registry.indicator(14, &messages).text, "no layer assigned");

    assert_eq!(benches.attach(&mut map).await.status, BatchStatus::Completed);
    assert!(!map.registry.indicator(14, &messages).visible);

    assert_eq!(shops.attach(&mut map).await.status, BatchStatus::BelowMinZoom);
    let state = map.registry.indicator(14, &messages);
    assert!(state.visible);
    assert_eq!(state.text, "current Zoom-Level: 14 all data at Level: 15");

    shops.detach(&mut map);
    assert_eq!(map.registry.effective_min_zoom(), Some(13));
    benches.detach(&mut map);
    assert_eq!(map.registry.indicator(14, &messages).text, "no layer assigned");
}

#[tokio::test]
async fn test_static_query_ignores_viewport() {
    let mut map = TestMap::new(berlin(), 16);
    let client = FixedClient::new(SHOPS);
    let mut layer = OverpassLayer::new(
        LayerConfig::default().with_query("node(id:100,101);out;"),
        client,
    );

    assert_eq!(layer.attach(&mut map).await.queued, 1);
    for east in [13.43, 13.45, 13.47] {
        map.viewport = GeoBounds::new(52.49, east - 0.02, 52.50, east);
        let report = layer.on_viewport_settle(&mut map).await;
        assert_eq!(report.status, BatchStatus::AlreadyRequested);
    }
    assert_eq!(layer.client_requests(), 1);
}

/// Request count of the layer's client.
trait ClientRequests {
    fn client_requests(&self) -> usize;
}

impl ClientRequests for OverpassLayer<FixedClient> {
    fn client_requests(&self) -> usize {
        self.client().request_count()
    }
}
