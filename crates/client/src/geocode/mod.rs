//! Geocoding API client.
//!
//! Resolves free-text locations through a `geocode.maps.co` compatible
//! provider.
//!
//! ### Behavior
//!
//! - **Endpoint**: `GET {base_url}/search?q=<query>[&api_key=<key>]`
//! - **Timeout**: short (1s default); the call sits in the request path.
//! - **Retries**: none. Failures go straight back to the caller.
//! - **Selection**: first candidate only.

pub mod error;
pub mod request;
pub mod response;

pub use error::GeocodeError;
pub use request::GeocodeRequest;
pub use response::{Candidate, CoordinateValue};

use async_trait::async_trait;
use propsearch_core::{AppConfig, Coordinates, Error, Geocoder};
use reqwest::header;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default base URL for the geocoding provider.
const DEFAULT_BASE_URL: &str = "https://geocode.maps.co";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "propsearch/0.1";

/// Geocoding client configuration.
#[derive(Debug, Clone)]
pub struct GeocodeConfig {
    /// Base URL (default: https://geocode.maps.co).
    pub base_url: String,
    /// API key, appended as the `api_key` query parameter when set.
    pub api_key: Option<String>,
    /// Request timeout (default: 1s).
    pub timeout: Duration,
    /// User-agent string (default: propsearch/0.x).
    pub user_agent: String,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&AppConfig> for GeocodeConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.geocode_base_url.clone(),
            api_key: config.geocode_api_key.clone(),
            timeout: config.geocode_timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Geocoding API client.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    http: reqwest::Client,
    search_url: url::Url,
    config: GeocodeConfig,
}

impl GeocodeClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GeocodeConfig) -> Result<Self, GeocodeError> {
        let base = url::Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| GeocodeError::InvalidBaseUrl(format!("{}: {e}", config.base_url)))?;
        let search_url = url::Url::parse(&format!("{}/search", base.as_str().trim_end_matches('/')))
            .map_err(|e| GeocodeError::InvalidBaseUrl(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GeocodeError::Network(Arc::new(e)))?;

        Ok(Self { http, search_url, config })
    }

    /// Resolve a free-text location to coordinates.
    ///
    /// Only the provider's first candidate is considered.
    pub async fn search(&self, query: &str) -> Result<Coordinates, GeocodeError> {
        let req = GeocodeRequest::new(query, self.config.api_key.clone());
        req.validate()?;

        let start = Instant::now();
        tracing::debug!(query, "geocoding lookup");

        let http_response = self
            .http
            .get(self.search_url.clone())
            .header(header::ACCEPT, "application/json")
            .query(&req)
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!(%status, "geocoding response status");

        if status == 401 || status == 403 {
            return Err(GeocodeError::AuthError);
        }

        if status == 429 {
            return Err(GeocodeError::RateLimited);
        }

        if !status.is_success() {
            return Err(GeocodeError::HttpError { status: status.as_u16() });
        }

        let bytes = http_response.bytes().await?;
        let candidate = response::first_candidate(query, &bytes)?;
        let coords = candidate.coordinates()?;

        tracing::debug!(
            query,
            latitude = coords.latitude,
            longitude = coords.longitude,
            place = candidate.display_name.as_deref().unwrap_or(""),
            "geocoding completed in {:?}",
            start.elapsed()
        );

        Ok(coords)
    }
}

#[async_trait]
impl Geocoder for GeocodeClient {
    async fn resolve(&self, query: &str) -> Result<Coordinates, Error> {
        self.search(query).await.map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GeocodeClient {
        GeocodeClient::new(GeocodeConfig { base_url: server.uri(), ..Default::default() }).unwrap()
    }

    #[test]
    fn test_client_new_invalid_base_url() {
        let config = GeocodeConfig { base_url: "not a url".into(), ..Default::default() };
        assert!(matches!(GeocodeClient::new(config), Err(GeocodeError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_search_url_joins_path() {
        let config = GeocodeConfig { base_url: "https://geo.example.com/".into(), ..Default::default() };
        let client = GeocodeClient::new(config).unwrap();
        assert_eq!(client.search_url.as_str(), "https://geo.example.com/search");
    }

    #[test]
    fn test_config_from_app_config() {
        let app = AppConfig { geocode_api_key: Some("secret".into()), geocode_timeout_ms: 800, ..Default::default() };
        let config = GeocodeConfig::from(&app);
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Duration::from_millis(800));
        assert_eq!(config.base_url, "https://geocode.maps.co");
    }

    #[tokio::test]
    async fn test_resolves_first_candidate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Springfield"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"lat": "39.7990", "lon": "-89.6440"}, {"lat": "42.1015", "lon": "-72.5898"}]"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let coords = client_for(&server).resolve("Springfield").await.unwrap();
        assert_eq!(coords, Coordinates { latitude: 39.799, longitude: -89.644 });
    }

    #[tokio::test]
    async fn test_sends_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("api_key", "k-123"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"[{"lat": 1, "lon": 2}]"#))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeocodeClient::new(GeocodeConfig {
            base_url: server.uri(),
            api_key: Some("k-123".into()),
            ..Default::default()
        })
        .unwrap();

        assert!(client.resolve("anywhere").await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_result_is_location_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        let result = client_for(&server).resolve("Atlantis").await;
        assert!(matches!(result, Err(Error::LocationNotFound(_))));
    }

    #[tokio::test]
    async fn test_malformed_body_is_location_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"unexpected": "object"}"#))
            .mount(&server)
            .await;

        let result = client_for(&server).resolve("Paris").await;
        assert!(matches!(result, Err(Error::LocationNotFound(_))));
    }

    #[tokio::test]
    async fn test_server_error_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = client_for(&server).search("Paris").await;
        assert!(matches!(result, Err(GeocodeError::HttpError { status: 503 })));

        let result = client_for(&server).resolve("Paris").await;
        assert!(matches!(result, Err(Error::UpstreamError(_))));
    }

    #[tokio::test]
    async fn test_auth_and_rate_limit_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "locked"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("q", "busy"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(matches!(client.search("locked").await, Err(GeocodeError::AuthError)));
        assert!(matches!(client.search("busy").await, Err(GeocodeError::RateLimited)));
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"[{"lat": 1, "lon": 2}]"#)
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = GeocodeClient::new(GeocodeConfig {
            base_url: server.uri(),
            timeout: Duration::from_millis(100),
            ..Default::default()
        })
        .unwrap();

        let result = client.resolve("Paris").await;
        assert!(matches!(result, Err(Error::UpstreamTimeout(_))));
    }

    #[tokio::test]
    async fn test_blank_query_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(0)
            .mount(&server)
            .await;

        let result = client_for(&server).resolve("   ").await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_upstream_error() {
        // Nothing listens on port 9 of the loopback interface.
        let client = GeocodeClient::new(GeocodeConfig { base_url: "http://127.0.0.1:9".into(), ..Default::default() })
            .unwrap();

        let result = client.resolve("Paris").await;
        assert!(matches!(result, Err(Error::UpstreamError(_)) | Err(Error::UpstreamTimeout(_))));
    }
}
