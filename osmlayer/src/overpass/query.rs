//! Overpass query templates and request URLs.

use reqwest::Url;

use super::error::FetchError;
use crate::coord::GeoBounds;

/// Token in a query template replaced by the tile bbox.
pub const BBOX_PLACEHOLDER: &str = "BBOX";

/// Path appended to the configured endpoint.
pub const INTERPRETER_PATH: &str = "interpreter";

/// Output format prefix prepended to every query.
pub const JSON_OUTPUT_PREFIX: &str = "[out:json];";

/// An Overpass QL query with optional `BBOX` placeholders.
///
/// ```
/// use osmlayer::coord::GeoBounds;
/// use osmlayer::overpass::QueryTemplate;
///
/// let query = QueryTemplate::new("node(BBOX)[amenity=bench];out qt;");
/// let bbox = GeoBounds::new(52.5, 13.4, 52.51, 13.41);
/// assert_eq!(query.render(Some(&bbox)), "node(52.5,13.4,52.51,13.41)[amenity=bench];out qt;");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTemplate {
    text: String,
}

impl QueryTemplate {
    /// Wrap query text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The raw template text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// True when the query depends on the viewport.
    pub fn has_bbox_placeholder(&self) -> bool {
        self.text.contains(BBOX_PLACEHOLDER)
    }

    /// Substitute every placeholder with `bbox` formatted as `south,west,north,east`.
    ///
    /// With `None`, or a template without placeholders, the text is returned as is.
    pub fn render(&self, bbox: Option<&GeoBounds>) -> String {
        match bbox {
            Some(bbox) => self
                .text
                .replace(BBOX_PLACEHOLDER, &bbox.to_bbox_string()),
            None => self.text.clone(),
        }
    }

    /// Full GET URL for this query against `endpoint`.
    ///
    /// The query is sent as the percent-encoded `data` parameter of
    /// `<endpoint>interpreter`, prefixed with `[out:json];`.
    pub fn request_url(
        &self,
        endpoint: &str,
        bbox: Option<&GeoBounds>,
    ) -> Result<String, FetchError> {
        let base = format!("{}{}", endpoint, INTERPRETER_PATH);
        let data = format!("{}{}", JSON_OUTPUT_PREFIX, self.render(bbox));
        Url::parse_with_params(&base, &[("data", data)])
            .map(String::from)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base, e)))
    }
}

impl From<&str> for QueryTemplate {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for QueryTemplate {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
