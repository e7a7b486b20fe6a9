//! Overpass JSON response model.

use serde::Deserialize;

use super::error::FetchError;
use crate::coord::LatLng;
use crate::osm::{ElementId, ElementKind, TagMap};

/// Top level of an `[out:json]` response.
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassResponse {
    /// Returned elements
    pub elements: Vec<Element>,
}

/// Center point emitted by `out center` for ways and relations.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Center {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

/// One element of a response.
#[derive(Debug, Clone, Deserialize)]
pub struct Element {
    /// Element id, unique within its kind
    pub id: i64,
    /// Element kind
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Node latitude
    #[serde(default)]
    pub lat: Option<f64>,
    /// Node longitude
    #[serde(default)]
    pub lon: Option<f64>,
    /// Derived center of a non-node element
    #[serde(default)]
    pub center: Option<Center>,
    /// Element tags
    #[serde(default)]
    pub tags: TagMap,
}

impl Element {
    /// Identity used for duplicate suppression.
    pub fn element_id(&self) -> ElementId {
        ElementId::new(self.kind, self.id.to_string())
    }

    /// Where to draw the element.
    ///
    /// Nodes use their own coordinates, everything else its `center`.
    /// `None` when the relevant fields are missing or not finite.
    pub fn position(&self) -> Option<LatLng> {
        let position = match self.kind {
            ElementKind::Node => LatLng::new(self.lat?, self.lon?),
            _ => {
                let center = self.center?;
                LatLng::new(center.lat, center.lon)
            }
        };
        position.is_finite().then_some(position)
    }
}

/// Decode a response body.
pub fn parse_response(body: &[u8]) -> Result<OverpassResponse, FetchError> {
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_node_and_way_with_center() {
        let body = br#"{
            "version": 0.6,
            "elements": [
                {"type": "node", "id": 1, "lat": 52.5, "lon": 13.4, "tags": {"organic": "only"}},
                {"type": "way", "id": 2, "center": {"lat": 52.6, "lon": 13.5}, "tags": {"shop": "farm"}}
            ]
        }"#;

        let response = parse_response(body).unwrap();
        assert_eq!(response.elements.len(), 2);

        let node = &response.elements[0];
        assert_eq!(node.position(), Some(LatLng::new(52.5, 13.4)));
        assert_eq!(node.element_id().to_string(), "node/1");
        assert_eq!(node.tags.get("organic").map(String::as_str), Some("only"));

        let way = &response.elements[1];
        assert_eq!(way.position(), Some(LatLng::new(52.6, 13.5)));
    }

    #[test]
    fn test_way_without_center_has_no_position() {
        let body = br#"{"elements": [{"type": "way", "id": 2, "lat": 1.0, "lon": 1.0}]}"#;
        let response = parse_response(body).unwrap();
        assert_eq!(response.elements[0].position(), None);
    }

    #[test]
    fn test_missing_tags_default_to_empty() {
        let body = br#"{"elements": [{"type": "node", "id": 3, "lat": 0.0, "lon": 0.0}]}"#;
        let response = parse_response(body).unwrap();
        assert!(response.elements[0].tags.is_empty());
    }

    #[test]
    fn test_unknown_type_is_accepted() {
        let body = br#"{"elements": [{"type": "count", "id": 0}]}"#;
        let response = parse_response(body).unwrap();
        assert_eq!(response.elements[0].kind, ElementKind::Unknown);
    }

    #[test]
    fn test_missing_elements_is_malformed() {
        let result = parse_response(br#"{"remark": "runtime error"}"#);
        assert!(matches!(result, Err(FetchError::MalformedResponse(_))));
    }

    #[test]
    fn test_non_json_is_malformed() {
        let result = parse_response(b"<html>429 Too Many Requests</html>");
        assert!(matches!(result, Err(FetchError::MalformedResponse(_))));
    }
}
