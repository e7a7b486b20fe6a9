//! Overpass API access
//!
//! Query templating, the HTTP client seam and the JSON response model used by
//! the viewport layer.
//!
//! # Example
//!
//! ```ignore
//! use osmlayer::overpass::{fetch, QueryTemplate, ReqwestClient};
//!
//! let client = ReqwestClient::new()?;
//! let query = QueryTemplate::new("node(BBOX)[amenity=bench];out qt;");
//! let url = query.request_url("http://overpass-api.de/api/", Some(&bbox))?;
//! let response = fetch(&client, &url).await?;
//! ```

mod error;
mod http;
mod query;
mod response;

pub use error::FetchError;
pub use http::{AsyncHttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use query::{QueryTemplate, BBOX_PLACEHOLDER, INTERPRETER_PATH, JSON_OUTPUT_PREFIX};
pub use response::{parse_response, Center, Element, OverpassResponse};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;

/// GET `url` and decode the body as an Overpass response.
pub async fn fetch<C: AsyncHttpClient>(
    client: &C,
    url: &str,
) -> Result<OverpassResponse, FetchError> {
    let body = client.get(url).await?;
    parse_response(&body)
}
