//! Area-vs-line classification of ways.

use std::collections::HashSet;

use super::model::{TagMap, Way};

/// Tag keys that turn a closed way into an area by default.
pub const DEFAULT_AREA_TAGS: &[&str] = &["leisure", "tourism", "landuse", "natural", "sport"];

/// Configured set of area-implying tag keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaTags {
    keys: HashSet<String>,
}

impl AreaTags {
    /// Create a set from any list of keys.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// True when `key` implies an area.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// True when any tag key implies an area.
    pub fn any_in(&self, tags: &TagMap) -> bool {
        tags.keys().any(|key| self.contains(key))
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<_> = self.keys.iter().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Classify a way: closed ring plus at least one area-implying key.
    pub fn is_way_area(&self, way: &Way) -> bool {
        way.is_closed() && self.any_in(&way.tags)
    }
}

impl Default for AreaTags {
    fn default() -> Self {
        Self::new(DEFAULT_AREA_TAGS.iter().copied())
    }
}
