//! `query` command: run one layer refresh against a bbox and print the results.

use osmlayer::coord::{GeoBounds, LatLng};
use osmlayer::layer::{MapHost, MinZoomRegistry};
use osmlayer::osm::{ElementId, TagMap};
use osmlayer::overpass::ReqwestClient;
use osmlayer::{LayerConfig, OverpassLayer, RenderSink};

use crate::error::CliError;

/// Map host that prints every drawn element to stdout.
pub struct ConsoleHost {
    viewport: GeoBounds,
    zoom: u8,
    uninteresting: Vec<String>,
    registry: MinZoomRegistry,
    lines: Vec<String>,
}

impl ConsoleHost {
    /// Create a host showing `viewport` at `zoom`.
    pub fn new(viewport: GeoBounds, zoom: u8, uninteresting: Vec<String>) -> Self {
        Self {
            viewport,
            zoom,
            uninteresting,
            registry: MinZoomRegistry::new(),
            lines: Vec::new(),
        }
    }

    /// Lines printed so far.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl RenderSink for ConsoleHost {
    fn render_point(&mut self, position: LatLng, tags: &TagMap, id: &ElementId) {
        let mut shown: Vec<String> = tags
            .iter()
            .filter(|(k, _)| !self.uninteresting.iter().any(|u| u == *k))
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        shown.sort();

        let line = format!(
            "{:<20} {:>10.6},{:<11.6} {}  {}",
            id.to_string(),
            position.lat,
            position.lon,
            shown.join(" "),
            id.edit_url()
        );
        println!("{}", line);
        self.lines.push(line);
    }

    fn render_area(&mut self, _boundary: &[LatLng]) {}

    fn render_line(&mut self, _path: &[LatLng]) {}
}

impl MapHost for ConsoleHost {
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

/// Run the query command.
pub fn run(bbox: GeoBounds, zoom: u8, config: LayerConfig) -> Result<(), CliError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::RuntimeCreation(e.to_string()))?;

    let client = ReqwestClient::with_timeout(config.request_timeout_secs)?;
    let mut host = ConsoleHost::new(bbox, zoom, config.uninteresting_tags.clone());
    let mut layer = OverpassLayer::new(config, client);

    let report = runtime.block_on(layer.attach(&mut host));
    let indicator = layer.indicator(&mut host);
    layer.detach(&mut host);

    println!();
    if indicator.visible {
        println!("{}", indicator.text);
    }
    println!(
        "{}: {} requests ({} failed), {} elements",
        report.status, report.queued, report.failed, report.merged
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_host_formats_point() {
        let mut host = ConsoleHost::new(
            GeoBounds::new(0.0, 0.0, 1.0, 1.0),
            16,
            vec!["created_by".to_string()],
        );
        let tags: TagMap = [
            ("organic".to_string(), "only".to_string()),
            ("created_by".to_string(), "JOSM".to_string()),
        ]
        .into_iter()
        .collect();

        host.render_point(
            LatLng::new(52.5, 13.4),
            &tags,
            &ElementId::new(osmlayer::osm::ElementKind::Node, "42"),
        );

        let line = &host.lines()[0];
        assert!(line.starts_with("node/42"));
        assert!(line.contains("52.500000,13.400000"));
        assert!(line.contains("organic=only"));
        assert!(!line.contains("created_by"));
        assert!(line.ends_with("https://www.openstreetmap.org/edit?editor=id&node=42"));
    }
}
