//! Hand built features to a host for drawing.

use tracing::debug;

use super::model::{Feature, WayGeometry};
use crate::layer::RenderSink;

/// Counts of what [`add_features`] drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    /// Points drawn
    pub points: usize,
    /// Areas drawn (changesets and area ways)
    pub areas: usize,
    /// Lines drawn
    pub lines: usize,
    /// Features that had nothing drawable
    pub skipped: usize,
}

/// Draw every feature on `sink`.
///
/// Changesets are drawn as their bounding rectangle, nodes as points and ways
/// according to their area/line classification. Degenerate ways and relations
/// are skipped.
pub fn add_features<S: RenderSink + ?Sized>(sink: &mut S, features: &[Feature]) -> RenderSummary {
    let mut summary = RenderSummary::default();

    for feature in features {
        match feature {
            Feature::Changeset(changeset) => {
                sink.render_area(&changeset.bounds.corners());
                summary.areas += 1;
            }
            Feature::Node(node) => {
                sink.render_point(node.position, &node.tags, &feature.element_id());
                summary.points += 1;
            }
            Feature::Way(way) => match way.geometry() {
                WayGeometry::Area(ring) => {
                    sink.render_area(&ring);
                    summary.areas += 1;
                }
                WayGeometry::Line(path) => {
                    sink.render_line(&path);
                    summary.lines += 1;
                }
                WayGeometry::Degenerate => {
                    debug!(way = %way.id, slots = way.nodes.len(), "Skipping degenerate way");
                    summary.skipped += 1;
                }
            },
            Feature::Relation(relation) => {
                debug!(relation = %relation.id, "Relations have no drawable geometry");
                summary.skipped += 1;
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::GeoBounds;
    use crate::layer::host::tests::RecordingHost;
    use crate::osm::FeatureBuilder;

    const XML: &str = r#"<osm>
        <changeset id="1" min_lat="0" min_lon="0" max_lat="1" max_lon="1"/>
        <node id="1" lat="0" lon="0"/><node id="2" lat="0" lon="1"/><node id="3" lat="1" lon="1"/>
        <way id="10"><nd ref="1"/><nd ref="2"/><nd ref="3"/><nd ref="1"/><tag k="leisure" v="park"/></way>
        <way id="11"><nd ref="1"/><nd ref="2"/></way>
        <way id="12"><nd ref="1"/><nd ref="99"/></way>
    </osm>"#;

    #[test]
    fn test_add_features_draws_by_kind() {
        let graph = FeatureBuilder::default().build(XML).unwrap();
        let mut host = RecordingHost::new(GeoBounds::new(0.0, 0.0, 1.0, 1.0), 16);

        let summary = add_features(&mut host, graph.features());

        assert_eq!(
            summary,
            RenderSummary {
                points: 0,
                areas: 2,
                lines: 1,
                skipped: 1,
            }
        );
        assert_eq!(host.areas[0].len(), 4);
        assert_eq!(host.areas[1].len(), 3);
        assert_eq!(host.lines[0].len(), 2);
    }
}
