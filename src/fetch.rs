//! Product detail lookup.
//!
//! One `GET <api_base><slug>` per overlay session. Transport failures, non-2xx
//! statuses and bodies that are not a product all end up as a [`FetchError`];
//! the overlay treats every variant the same way and the variant only shows
//! up in the log.

use thiserror::Error;
use tracing::{debug, warn};

use crate::types::ProductDetail;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("lookup returned status {0}")]
    Status(u16),
    #[error("malformed product payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Raw response of the lookup service.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupResponse {
    pub status: u16,
    pub body: String,
}

impl LookupResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

/// Transport used to reach the product lookup service.
///
/// The browser build implements this on top of `fetch`; tests substitute
/// canned responses.
#[allow(async_fn_in_trait)]
pub trait ProductLookup {
    async fn get(&self, url: &str) -> Result<LookupResponse, FetchError>;
}

/// Lookup URL for one product.
pub fn product_url(api_base: &str, slug: &str) -> String {
    format!("{}{}", api_base, urlencoding::encode(slug))
}

/// Turn a raw response into a product, or the single error signal.
pub fn parse_detail(response: &LookupResponse) -> Result<ProductDetail, FetchError> {
    if !(200..300).contains(&response.status) {
        return Err(FetchError::Status(response.status));
    }
    Ok(serde_json::from_str(&response.body)?)
}

/// The detail fetch pipeline: builds the URL, performs the lookup, parses.
#[derive(Debug, Clone)]
pub struct DetailPipeline<L> {
    lookup: L,
    api_base: String,
}

impl<L: ProductLookup> DetailPipeline<L> {
    pub fn new(lookup: L, api_base: impl Into<String>) -> Self {
        Self {
            lookup,
            api_base: api_base.into(),
        }
    }

    pub async fn fetch(&self, slug: &str) -> Result<ProductDetail, FetchError> {
        let url = product_url(&self.api_base, slug);
        debug!(%url, "fetching product detail");
        let result = match self.lookup.get(&url).await {
            Ok(response) => parse_detail(&response),
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            warn!(slug, error = %err, "product detail lookup failed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::CannedLookup;
    use futures::executor::block_on;

    #[test]
    fn url_encodes_the_slug() {
        assert_eq!(product_url("/api/producto/", "cafe-huila"), "/api/producto/cafe-huila");
        assert_eq!(product_url("/api/producto/", "a b/c"), "/api/producto/a%20b%2Fc");
    }

    #[test]
    fn non_success_status_is_an_error() {
        let response = LookupResponse {
            status: 404,
            body: "<html>Not found</html>".to_string(),
        };
        assert!(matches!(parse_detail(&response), Err(FetchError::Status(404))));
    }

    #[test]
    fn unparseable_body_is_an_error() {
        let response = LookupResponse::ok("<html>oops</html>");
        assert!(matches!(parse_detail(&response), Err(FetchError::Malformed(_))));
        let response = LookupResponse::ok(r#"{"origin":"Huila"}"#);
        assert!(matches!(parse_detail(&response), Err(FetchError::Malformed(_))));
    }

    #[test]
    fn pipeline_requests_product_url() {
        let lookup = CannedLookup::ok(r#"{"name":"Café","origin":"Huila"}"#);
        let pipeline = DetailPipeline::new(lookup.clone(), "/api/producto/");
        let detail = block_on(pipeline.fetch("cafe")).unwrap();
        assert_eq!(detail.name, "Café");
        assert_eq!(lookup.requested(), vec!["/api/producto/cafe".to_string()]);
    }

    #[test]
    fn pipeline_passes_transport_failure_through() {
        let pipeline = DetailPipeline::new(CannedLookup::failing(), "/api/producto/");
        let result = block_on(pipeline.fetch("cafe"));
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }
}
