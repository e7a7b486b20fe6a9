//! Typed map features produced from an OSM XML document.
//!
//! Every entity is immutable once built. Ways and relations hold their
//! resolved nodes through `Arc`, so the same node is shared by every way that
//! references it and identity comparisons stay cheap.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::coord::{GeoBounds, LatLng};

/// Key/value tags of an entity. Keys are unique; order carries no meaning.
pub type TagMap = HashMap<String, String>;

/// A resolved member slot: `None` when the reference could not be resolved.
pub type NodeSlot = Option<Arc<Node>>;

/// Kinds of OSM entities, shared by the XML builder and Overpass responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A changeset (XML only)
    Changeset,
    /// A single point
    Node,
    /// An ordered list of nodes
    Way,
    /// A group of members
    Relation,
    /// An Overpass derived area
    Area,
    /// Any type this crate does not know about
    #[serde(other)]
    Unknown,
}

impl ElementKind {
    /// Lowercase OSM name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Changeset => "changeset",
            ElementKind::Node => "node",
            ElementKind::Way => "way",
            ElementKind::Relation => "relation",
            ElementKind::Area => "area",
            ElementKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of an element: its kind plus its id within that kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementId {
    /// Element kind
    pub kind: ElementKind,
    /// OSM id as it appeared in the source
    pub id: String,
}

impl ElementId {
    /// Create a new element id.
    pub fn new(kind: ElementKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    /// Link that opens this element in the iD editor on openstreetmap.org.
    pub fn edit_url(&self) -> String {
        format!(
            "https://www.openstreetmap.org/edit?editor=id&{}={}",
            self.kind, self.id
        )
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

/// A single tagged point.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Node id
    pub id: String,
    /// Position in degrees
    pub position: LatLng,
    /// Node tags
    pub tags: TagMap,
}

/// An ordered path of nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Way {
    /// Way id
    pub id: String,
    /// One slot per `nd` reference, in document order
    pub nodes: Vec<NodeSlot>,
    /// Way tags
    pub tags: TagMap,
    /// Closed ring carrying an area-implying tag
    pub is_area: bool,
}

/// Renderable geometry derived from a way.
#[derive(Debug, Clone, PartialEq)]
pub enum WayGeometry {
    /// Polygon ring without the repeated closing vertex.
    Area(Vec<LatLng>),
    /// Open or untagged path.
    Line(Vec<LatLng>),
    /// Fewer than two resolved nodes.
    Degenerate,
}

impl Way {
    /// Positions of the resolved nodes, skipping absent slots.
    pub fn resolved_positions(&self) -> Vec<LatLng> {
        self.nodes
            .iter()
            .flatten()
            .map(|node| node.position)
            .collect()
    }

    /// Number of slots whose reference did not resolve.
    pub fn missing_nodes(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_none()).count()
    }

    /// True when the first and last slots resolve to the same node.
    pub fn is_closed(&self) -> bool {
        match (self.nodes.first(), self.nodes.last()) {
            (Some(Some(first)), Some(Some(last))) if self.nodes.len() > 1 => {
                Arc::ptr_eq(first, last) || first.id == last.id
            }
            _ => false,
        }
    }

    /// Build the geometry used for rendering.
    ///
    /// A line needs two resolved positions and an area ring three distinct
    /// vertices once the closing vertex is dropped.
    pub fn geometry(&self) -> WayGeometry {
        let mut positions = self.resolved_positions();
        if self.is_area {
            positions.pop();
            if positions.len() < 3 {
                return WayGeometry::Degenerate;
            }
            WayGeometry::Area(positions)
        } else if positions.len() < 2 {
            WayGeometry::Degenerate
        } else {
            WayGeometry::Line(positions)
        }
    }
}

/// A group of members. Only node members are resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    /// Relation id
    pub id: String,
    /// One slot per `member`; way and relation members are always `None`
    pub members: Vec<NodeSlot>,
    /// Relation tags
    pub tags: TagMap,
}

/// An OSM changeset with its bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Changeset {
    /// Changeset id
    pub id: String,
    /// Extent of the changeset
    pub bounds: GeoBounds,
    /// Changeset tags
    pub tags: TagMap,
}

/// A typed map feature.
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    /// A changeset
    Changeset(Changeset),
    /// A node
    Node(Arc<Node>),
    /// A way
    Way(Way),
    /// A relation
    Relation(Relation),
}

impl Feature {
    /// Identity of the feature.
    pub fn element_id(&self) -> ElementId {
        match self {
            Feature::Changeset(c) => ElementId::new(ElementKind::Changeset, c.id.as_str()),
            Feature::Node(n) => ElementId::new(ElementKind::Node, n.id.as_str()),
            Feature::Way(w) => ElementId::new(ElementKind::Way, w.id.as_str()),
            Feature::Relation(r) => ElementId::new(ElementKind::Relation, r.id.as_str()),
        }
    }

    /// Tags of the feature.
    pub fn tags(&self) -> &TagMap {
        match self {
            Feature::Changeset(c) => &c.tags,
            Feature::Node(n) => &n.tags,
            Feature::Way(w) => &w.tags,
            Feature::Relation(r) => &r.tags,
        }
    }

    /// Tags minus the given uninteresting keys, sorted by key.
    pub fn interesting_tags<'a>(&'a self, uninteresting: &[String]) -> Vec<(&'a str, &'a str)> {
        let mut tags: Vec<_> = self
            .tags()
            .iter()
            .filter(|(k, _)| !uninteresting.iter().any(|u| u == *k))
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        tags.sort_unstable();
        tags
    }
}
