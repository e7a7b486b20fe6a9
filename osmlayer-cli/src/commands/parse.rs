//! `parse` command: print the feature graph of an OSM XML file.

use std::path::Path;

use osmlayer::coord::LatLng;
use osmlayer::osm::{
    render::add_features, AreaTags, ElementId, Feature, FeatureBuilder, TagMap, WayGeometry,
};
use osmlayer::{LayerConfig, RenderSink};

use crate::error::CliError;

/// Run the parse command.
pub fn run(
    file: &Path,
    area_tags: Option<Vec<String>>,
    config: &LayerConfig,
) -> Result<(), CliError> {
    let area_tags = AreaTags::new(area_tags.unwrap_or_else(|| config.area_tags.clone()));
    let graph = FeatureBuilder::new(area_tags).build_file(file)?;

    for line in describe(graph.features(), &config.uninteresting_tags) {
        println!("{}", line);
    }

    let summary = add_features(&mut NullSink, graph.features());
    println!();
    println!(
        "{} features: {} areas, {} lines, {} points, {} skipped",
        graph.features().len(),
        summary.areas,
        summary.lines,
        summary.points,
        summary.skipped
    );
    println!(
        "{} nodes, {} relations",
        graph.nodes().len(),
        graph.relations().len()
    );

    if !graph.rejected().is_empty() {
        println!();
        println!("Rejected entities:");
        for error in graph.rejected() {
            println!("  {}", error);
        }
    }

    Ok(())
}

/// One line per feature: id, geometry kind, interesting tags.
pub fn describe(features: &[Feature], uninteresting: &[String]) -> Vec<String> {
    features
        .iter()
        .map(|feature| {
            let kind = match feature {
                Feature::Changeset(_) => "area".to_string(),
                Feature::Node(_) => "point".to_string(),
                Feature::Way(way) => match way.geometry() {
                    WayGeometry::Area(ring) => format!("area({})", ring.len()),
                    WayGeometry::Line(path) => format!("line({})", path.len()),
                    WayGeometry::Degenerate => "degenerate".to_string(),
                },
                Feature::Relation(relation) => format!("relation({})", relation.members.len()),
            };
            let tags: Vec<String> = feature
                .interesting_tags(uninteresting)
                .into_iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            format!("{:<20} {:<12} {}", feature.element_id().to_string(), kind, tags.join(" "))
                .trim_end()
                .to_string()
        })
        .collect()
}

/// Sink that draws nothing; used for the summary counts.
struct NullSink;

impl RenderSink for NullSink {
    fn render_point(&mut self, _position: LatLng, _tags: &TagMap, _id: &ElementId) {}

    fn render_area(&mut self, _boundary: &[LatLng]) {}

    fn render_line(&mut self, _path: &[LatLng]) {}
}
