//! Geocoding request parameters.

use serde::Serialize;

use crate::geocode::GeocodeError;

/// Longest query forwarded to the provider.
pub const MAX_QUERY_CHARS: usize = 512;

/// Query string for the provider's `/search` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GeocodeRequest {
    /// Free-text location.
    pub q: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl GeocodeRequest {
    pub fn new(q: impl Into<String>, api_key: Option<String>) -> Self {
        Self { q: q.into(), api_key }
    }

    /// Reject queries that cannot produce a meaningful lookup.
    pub fn validate(&self) -> Result<(), GeocodeError> {
        if self.q.trim().is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }
        if self.q.chars().count() > MAX_QUERY_CHARS {
            return Err(GeocodeError::Malformed(format!("query longer than {MAX_QUERY_CHARS} characters")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request() {
        assert!(GeocodeRequest::new("Berlin", None).validate().is_ok());
    }

    #[test]
    fn test_blank_query() {
        assert!(matches!(GeocodeRequest::new("  ", None).validate(), Err(GeocodeError::EmptyQuery)));
    }

    #[test]
    fn test_query_too_long() {
        let req = GeocodeRequest::new("a".repeat(MAX_QUERY_CHARS + 1), None);
        assert!(matches!(req.validate(), Err(GeocodeError::Malformed(_))));
    }

    #[test]
    fn test_api_key_omitted_when_absent() {
        let without = serde_json::to_value(GeocodeRequest::new("Oslo", None)).unwrap();
        assert_eq!(without, serde_json::json!({ "q": "Oslo" }));

        let with = serde_json::to_value(GeocodeRequest::new("Oslo", Some("k".into()))).unwrap();
        assert_eq!(with, serde_json::json!({ "q": "Oslo", "api_key": "k" }));
    }
}
