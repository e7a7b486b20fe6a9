//! Integration tests for the OSM XML feature graph.
//!
//! These tests verify the full document flow:
//! - XML file → feature graph → drawn primitives
//! - Member resolution against the node table
//! - Area/line classification with default and custom area tags
//!
//! Run with: `cargo test --test feature_graph`

use std::io::Write;

use osmlayer::coord::LatLng;
use osmlayer::osm::{
    build_features, render::add_features, AreaTags, ElementId, Feature, FeatureBuilder,
    TagMap, WayGeometry,
};
use osmlayer::RenderSink;

// ============================================================================
// Helper Functions
// ============================================================================

/// A small park, a footpath, and a changeset around both.
const PARK_DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="test">
  <changeset id="42" min_lat="52.50" min_lon="13.40" max_lat="52.51" max_lon="13.41">
    <tag k="comment" v="Add park"/>
  </changeset>
  <node id="1" lat="52.500" lon="13.400"/>
  <node id="2" lat="52.500" lon="13.410"/>
  <node id="3" lat="52.510" lon="13.410"/>
  <node id="4" lat="52.510" lon="13.400"/>
  <way id="100">
    <nd ref="1"/><nd ref="2"/><nd ref="3"/><nd ref="4"/><nd ref="1"/>
    <tag k="leisure" v="park"/>
    <tag k="name" v="Testpark"/>
  </way>
  <way id="101">
    <nd ref="1"/><nd ref="3"/>
    <tag k="highway" v="footway"/>
  </way>
  <relation id="500">
    <member type="node" ref="2" role="entrance"/>
    <member type="way" ref="100" role="outer"/>
  </relation>
</osm>"#;

#[derive(Default)]
struct Canvas {
    points: usize,
    areas: Vec<usize>,
    lines: Vec<usize>,
}

impl RenderSink for Canvas {
    fn render_point(&mut self, _position: LatLng, _tags: &TagMap, _id: &ElementId) {
        self.points += 1;
    }

    fn render_area(&mut self, boundary: &[LatLng]) {
        self.areas.push(boundary.len());
    }

    fn render_line(&mut self, path: &[LatLng]) {
        self.lines.push(path.len());
    }
}

fn closed_way(tags: &str) -> String {
    format!(
        r#"<osm>
          <node id="1" lat="0" lon="0"/><node id="2" lat="0" lon="1"/><node id="3" lat="1" lon="1"/>
          <way id="7"><nd ref="1"/><nd ref="2"/><nd ref="3"/><nd ref="1"/>{}</way>
        </osm>"#,
        tags
    )
}

fn way_geometry(features: &[Feature]) -> WayGeometry {
    match features.iter().find(|f| matches!(f, Feature::Way(_))) {
        Some(Feature::Way(way)) => way.geometry(),
        _ => panic!("no way in document"),
    }
}

// ============================================================================
// Integration Tests
// ============================================================================

#[test]
fn test_file_to_drawn_primitives() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(PARK_DOCUMENT.as_bytes()).unwrap();

    let graph = FeatureBuilder::default().build_file(file.path()).unwrap();
    assert!(graph.rejected().is_empty());
    assert_eq!(graph.nodes().len(), 4);
    assert_eq!(graph.relations().len(), 1);

    let ids: Vec<String> = graph
        .features()
        .iter()
        .map(|f| f.element_id().to_string())
        .collect();
    assert_eq!(ids, vec!["changeset/42", "way/100", "way/101"]);

    let mut canvas = Canvas::default();
    let summary = add_features(&mut canvas, graph.features());

    assert_eq!(summary.areas, 2);
    assert_eq!(summary.lines, 1);
    // Changeset rectangle, then the park ring without its closing vertex
    assert_eq!(canvas.areas, vec![4, 4]);
    assert_eq!(canvas.lines, vec![2]);
    assert_eq!(canvas.points, 0);
}

#[test]
fn test_relation_resolves_node_members_only() {
    let graph = FeatureBuilder::default().build(PARK_DOCUMENT).unwrap();
    let relation = &graph.relations()[0];

    assert_eq!(relation.members.len(), 2);
    assert_eq!(relation.members[0].as_ref().map(|n| n.id.as_str()), Some("2"));
    assert!(relation.members[1].is_none());
}

#[test]
fn test_missing_node_reference_leaves_a_gap() {
    let xml = r#"<osm>
      <node id="1" lat="0" lon="0"/><node id="2" lat="0" lon="1"/>
      <way id="9"><nd ref="1"/><nd ref="404"/><nd ref="2"/></way>
    </osm>"#;

    let features = build_features(xml).unwrap();
    let Feature::Way(way) = &features[0] else {
        panic!("expected a way");
    };

    assert_eq!(way.nodes.len(), 3);
    assert!(way.nodes[1].is_none());
    assert_eq!(way.missing_nodes(), 1);
    assert_eq!(way.resolved_positions().len(), 2);
    assert!(matches!(way.geometry(), WayGeometry::Line(_)));
}

#[test]
fn test_closed_way_with_area_tag_is_area() {
    let features = build_features(&closed_way(r#"<tag k="landuse" v="meadow"/>"#)).unwrap();
    assert!(matches!(way_geometry(&features), WayGeometry::Area(ring) if ring.len() == 3));
}

#[test]
fn test_area_ring_with_missing_node_is_not_drawn() {
    let xml = r#"<osm>
      <node id="1" lat="0" lon="0"/>
      <way id="7"><nd ref="1"/><nd ref="404"/><nd ref="1"/><tag k="leisure" v="park"/></way>
    </osm>"#;
    let features = build_features(xml).unwrap();
    assert_eq!(way_geometry(&features), WayGeometry::Degenerate);

    let mut canvas = Canvas::default();
    let summary = add_features(&mut canvas, &features);
    assert_eq!(summary.areas, 0);
    assert_eq!(summary.skipped, 1);
    assert!(canvas.areas.is_empty());
}

#[test]
fn test_closed_way_without_area_tag_is_line() {
    let features = build_features(&closed_way(r#"<tag k="barrier" v="fence"/>"#)).unwrap();
    assert!(matches!(way_geometry(&features), WayGeometry::Line(path) if path.len() == 4));
}

#[test]
fn test_open_way_with_area_tag_is_line() {
    let xml = r#"<osm>
      <node id="1" lat="0" lon="0"/><node id="2" lat="0" lon="1"/>
      <way id="7"><nd ref="1"/><nd ref="2"/><tag k="leisure" v="track"/></way>
    </osm>"#;
    let features = build_features(xml).unwrap();
    assert!(matches!(way_geometry(&features), WayGeometry::Line(_)));
}

#[test]
fn test_custom_area_tags() {
    let builder = FeatureBuilder::new(AreaTags::new(["building"]));
    let graph = builder
        .build(&closed_way(r#"<tag k="building" v="yes"/>"#))
        .unwrap();
    assert!(matches!(way_geometry(graph.features()), WayGeometry::Area(_)));

    let graph = builder
        .build(&closed_way(r#"<tag k="leisure" v="park"/>"#))
        .unwrap();
    assert!(matches!(way_geometry(graph.features()), WayGeometry::Line(_)));
}

#[test]
fn test_malformed_entities_are_dropped_individually() {
    let xml = r#"<osm>
      <node id="1" lat="north" lon="0"/>
      <node lat="0" lon="0"/>
      <node id="3" lat="1" lon="1"/>
    </osm>"#;

    let graph = FeatureBuilder::default().build(xml).unwrap();
    assert_eq!(graph.nodes().len(), 1);
    assert_eq!(graph.rejected().len(), 2);
}

#[test]
fn test_invalid_xml_is_an_error() {
    assert!(build_features("<osm><node id=").is_err());
}
