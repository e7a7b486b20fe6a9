//! OSM XML feature graph
//!
//! Turns an OSM-style XML document (`changeset`, `node`, `way`, `relation`
//! elements with `tag` children) into typed [`Feature`]s. Way and relation
//! members are resolved against a node table built from the same document;
//! unresolved references become empty slots instead of errors.
//!
//! # Example
//!
//! ```
//! use osmlayer::osm::{FeatureBuilder, Feature, WayGeometry};
//!
//! let xml = r#"<osm>
//!   <node id="1" lat="0" lon="0"/><node id="2" lat="0" lon="1"/>
//!   <way id="10"><nd ref="1"/><nd ref="2"/></way>
//! </osm>"#;
//!
//! let graph = FeatureBuilder::default().build(xml).unwrap();
//! let Feature::Way(way) = &graph.features()[0] else { unreachable!() };
//! assert!(matches!(way.geometry(), WayGeometry::Line(_)));
//! ```

mod builder;
mod classify;
mod error;
mod model;
pub mod render;

pub use builder::{build_features, FeatureBuilder, FeatureGraph, NodeTable};
pub use classify::{AreaTags, DEFAULT_AREA_TAGS};
pub use error::{EntityError, EntityProblem, OsmError, OsmResult};
pub use model::{
    Changeset, ElementId, ElementKind, Feature, Node, NodeSlot, Relation, TagMap, Way,
    WayGeometry,
};
