//! XML document to feature graph.
//!
//! The build runs in four passes over the document, in this order:
//!
//! 1. `changeset` elements become [`Changeset`] features
//! 2. `node` elements fill the node resolution table
//! 3. `way` elements resolve their `nd` refs against the table and are
//!    appended after the changesets, in document order
//! 4. `relation` elements resolve their `node` members; they are kept on the
//!    graph but not appended to the default feature sequence
//!
//! Entities with missing or malformed attributes are dropped individually and
//! reported through [`FeatureGraph::rejected`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use roxmltree::{Document, Node as XmlNode};
use tracing::{debug, warn};

use super::classify::AreaTags;
use super::error::{EntityError, EntityProblem, OsmError, OsmResult};
use super::model::{Changeset, ElementKind, Feature, Node, NodeSlot, Relation, TagMap, Way};
use crate::coord::{GeoBounds, LatLng};

/// Node resolution table keyed by node id.
pub type NodeTable = HashMap<String, Arc<Node>>;

/// Output of a build.
#[derive(Debug, Clone, Default)]
pub struct FeatureGraph {
    features: Vec<Feature>,
    nodes: NodeTable,
    relations: Vec<Relation>,
    rejected: Vec<EntityError>,
}

impl FeatureGraph {
    /// Changesets followed by ways, in document order.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// The node resolution table.
    pub fn nodes(&self) -> &NodeTable {
        &self.nodes
    }

    /// Relations from the same resolution pass.
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Entities dropped because of missing or malformed attributes.
    pub fn rejected(&self) -> &[EntityError] {
        &self.rejected
    }

    /// Consume the graph, keeping only the default feature sequence.
    pub fn into_features(self) -> Vec<Feature> {
        self.features
    }
}

/// Builds feature graphs from OSM XML.
#[derive(Debug, Clone, Default)]
pub struct FeatureBuilder {
    area_tags: AreaTags,
}

impl FeatureBuilder {
    /// Create a builder with a custom set of area-implying keys.
    pub fn new(area_tags: AreaTags) -> Self {
        Self { area_tags }
    }

    /// The area-implying keys used for classification.
    pub fn area_tags(&self) -> &AreaTags {
        &self.area_tags
    }

    /// Parse `xml` and build the feature graph.
    ///
    /// Fails only when the text is not well-formed XML.
    pub fn build(&self, xml: &str) -> OsmResult<FeatureGraph> {
        let doc = Document::parse(xml)?;
        Ok(self.build_document(&doc))
    }

    /// Read a file and build the feature graph.
    pub fn build_file(&self, path: &Path) -> OsmResult<FeatureGraph> {
        let xml = std::fs::read_to_string(path).map_err(|source| OsmError::Read {
            path: path.display().to_string(),
            source,
        })?;
        self.build(&xml)
    }

    /// Build from an already parsed document.
    pub fn build_document(&self, doc: &Document<'_>) -> FeatureGraph {
        let mut rejected = Vec::new();

        let mut features: Vec<Feature> = changesets(doc, &mut rejected)
            .into_iter()
            .map(Feature::Changeset)
            .collect();
        let nodes = nodes(doc, &mut rejected);
        let ways = self.ways(doc, &nodes, &mut rejected);
        let relations = relations(doc, &nodes, &mut rejected);

        features.extend(ways.into_iter().map(Feature::Way));

        for err in &rejected {
            warn!(error = %err, "Dropped invalid entity");
        }
        debug!(
            features = features.len(),
            nodes = nodes.len(),
            relations = relations.len(),
            rejected = rejected.len(),
            "Built feature graph"
        );

        FeatureGraph {
            features,
            nodes,
            relations,
            rejected,
        }
    }

    fn ways(
        &self,
        doc: &Document<'_>,
        nodes: &NodeTable,
        rejected: &mut Vec<EntityError>,
    ) -> Vec<Way> {
        elements(doc, "way")
            .filter_map(|element| {
                let id = match required_id(&element, ElementKind::Way) {
                    Ok(id) => id,
                    Err(err) => {
                        rejected.push(err);
                        return None;
                    }
                };

                let slots: Vec<NodeSlot> = element
                    .children()
                    .filter(|child| child.has_tag_name("nd"))
                    .map(|nd| resolve(nodes, nd.attribute("ref")))
                    .collect();

                let mut way = Way {
                    id,
                    nodes: slots,
                    tags: tags(&element),
                    is_area: false,
                };
                way.is_area = self.area_tags.is_way_area(&way);
                Some(way)
            })
            .collect()
    }
}

/// Build the default feature sequence with the default area tags.
pub fn build_features(xml: &str) -> OsmResult<Vec<Feature>> {
    FeatureBuilder::default()
        .build(xml)
        .map(FeatureGraph::into_features)
}

fn elements<'a, 'input: 'a>(
    doc: &'a Document<'input>,
    name: &'a str,
) -> impl Iterator<Item = XmlNode<'a, 'input>> + 'a {
    doc.descendants()
        .filter(move |element| element.has_tag_name(name))
}

fn changesets(doc: &Document<'_>, rejected: &mut Vec<EntityError>) -> Vec<Changeset> {
    elements(doc, "changeset")
        .filter_map(|element| match changeset(&element) {
            Ok(changeset) => Some(changeset),
            Err(err) => {
                rejected.push(err);
                None
            }
        })
        .collect()
}

fn changeset(element: &XmlNode<'_, '_>) -> Result<Changeset, EntityError> {
    let id = required_id(element, ElementKind::Changeset)?;
    let read = |name| coordinate(element, name, ElementKind::Changeset, &id);

    let min_lat = read("min_lat")?;
    let min_lon = read("min_lon")?;
    let max_lat = read("max_lat")?;
    let max_lon = read("max_lon")?;

    Ok(Changeset {
        bounds: GeoBounds::from_corners(
            LatLng::new(min_lat, min_lon),
            LatLng::new(max_lat, max_lon),
        ),
        tags: tags(element),
        id,
    })
}

fn nodes(doc: &Document<'_>, rejected: &mut Vec<EntityError>) -> NodeTable {
    let mut table = NodeTable::new();
    for element in elements(doc, "node") {
        match node(&element) {
            Ok(node) => {
                table.insert(node.id.clone(), Arc::new(node));
            }
            Err(err) => rejected.push(err),
        }
    }
    table
}

fn node(element: &XmlNode<'_, '_>) -> Result<Node, EntityError> {
    let id = required_id(element, ElementKind::Node)?;
    let lat = coordinate(element, "lat", ElementKind::Node, &id)?;
    let lon = coordinate(element, "lon", ElementKind::Node, &id)?;

    Ok(Node {
        position: LatLng::new(lat, lon),
        tags: tags(element),
        id,
    })
}

fn relations(
    doc: &Document<'_>,
    nodes: &NodeTable,
    rejected: &mut Vec<EntityError>,
) -> Vec<Relation> {
    elements(doc, "relation")
        .filter_map(|element| {
            let id = match required_id(&element, ElementKind::Relation) {
                Ok(id) => id,
                Err(err) => {
                    rejected.push(err);
                    return None;
                }
            };

            // Way and relation membership is not resolved.
            let members = element
                .children()
                .filter(|child| child.has_tag_name("member"))
                .map(|member| match member.attribute("type") {
                    Some("node") => resolve(nodes, member.attribute("ref")),
                    _ => None,
                })
                .collect();

            Some(Relation {
                id,
                members,
                tags: tags(&element),
            })
        })
        .collect()
}

/// Collect the `tag` children of an element. Later duplicates win.
fn tags(element: &XmlNode<'_, '_>) -> TagMap {
    element
        .children()
        .filter(|child| child.has_tag_name("tag"))
        .filter_map(|tag| Some((tag.attribute("k")?.to_string(), tag.attribute("v")?.to_string())))
        .collect()
}

fn resolve(nodes: &NodeTable, reference: Option<&str>) -> NodeSlot {
    reference.and_then(|id| nodes.get(id)).cloned()
}

fn required_id(element: &XmlNode<'_, '_>, kind: ElementKind) -> Result<String, EntityError> {
    match element.attribute("id") {
        Some(id) if !id.trim().is_empty() => Ok(id.to_string()),
        _ => Err(EntityError {
            kind,
            id: None,
            problem: EntityProblem::MissingId,
        }),
    }
}

fn coordinate(
    element: &XmlNode<'_, '_>,
    attribute: &'static str,
    kind: ElementKind,
    id: &str,
) -> Result<f64, EntityError> {
    let invalid = |problem| EntityError {
        kind,
        id: Some(id.to_string()),
        problem,
    };

    let raw = element
        .attribute(attribute)
        .ok_or_else(|| invalid(EntityProblem::MissingAttribute(attribute)))?;

    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(invalid(EntityProblem::MalformedCoordinate {
            attribute,
            value: raw.to_string(),
        })),
    }
}
