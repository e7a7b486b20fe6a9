//! Layer configuration.

use crate::osm::DEFAULT_AREA_TAGS;
use crate::overpass::{QueryTemplate, DEFAULT_TIMEOUT_SECS};

use super::registry::IndicatorMessages;

// ==================== Layer Defaults ====================

/// Default Overpass API endpoint. The interpreter path is appended to it.
pub const DEFAULT_ENDPOINT: &str = "http://overpass-api.de/api/";

/// Default query: organic and second hand shops in the tile.
pub const DEFAULT_QUERY: &str = "(node(BBOX)[organic];node(BBOX)[second_hand];);out qt;";

/// Default zoom below which no data is loaded.
pub const DEFAULT_MIN_ZOOM: u8 = 15;

/// Tags hidden when listing an element's tags.
pub const DEFAULT_UNINTERESTING_TAGS: [&str; 9] = [
    "source",
    "source_ref",
    "source:ref",
    "history",
    "attribution",
    "created_by",
    "tiger:county",
    "tiger:tlid",
    "tiger:upload_uuid",
];

/// Configuration of one Overpass layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerConfig {
    // ==================== Overpass ====================
    /// API endpoint ending in `/`.
    ///
    /// Default: `http://overpass-api.de/api/`.
    pub endpoint: String,

    /// Query template. `BBOX` is replaced by each tile's bounds.
    pub query: QueryTemplate,

    /// Zoom level below which the layer loads nothing.
    ///
    /// Default: 15.
    pub min_zoom: u8,

    /// HTTP timeout per request in seconds.
    ///
    /// Default: 30 seconds.
    pub request_timeout_secs: u64,

    // ==================== Features ====================
    /// Tag keys that turn a closed way into an area.
    pub area_tags: Vec<String>,

    /// Tag keys hidden when listing tags.
    pub uninteresting_tags: Vec<String>,

    // ==================== Presentation ====================
    /// Log batch start and finish at info level instead of debug.
    pub debug: bool,

    /// Minimum zoom indicator texts.
    pub indicator_messages: IndicatorMessages,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            query: QueryTemplate::new(DEFAULT_QUERY),
            min_zoom: DEFAULT_MIN_ZOOM,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            area_tags: DEFAULT_AREA_TAGS.iter().map(|s| s.to_string()).collect(),
            uninteresting_tags: DEFAULT_UNINTERESTING_TAGS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            debug: false,
            indicator_messages: IndicatorMessages::default(),
        }
    }
}

impl LayerConfig {
    /// Set the API endpoint. A trailing `/` is added when missing.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let mut endpoint = endpoint.into();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        self.endpoint = endpoint;
        self
    }

    /// Set the query template.
    pub fn with_query(mut self, query: impl Into<QueryTemplate>) -> Self {
        self.query = query.into();
        self
    }

    /// Set the minimum zoom.
    pub fn with_min_zoom(mut self, min_zoom: u8) -> Self {
        self.min_zoom = min_zoom;
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Set the area tag keys.
    pub fn with_area_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.area_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the uninteresting tag keys.
    pub fn with_uninteresting_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.uninteresting_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable debug reporting.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the indicator texts.
    pub fn with_indicator_messages(mut self, messages: IndicatorMessages) -> Self {
        self.indicator_messages = messages;
        self
    }
}
