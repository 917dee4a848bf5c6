//! MBTA v3 API HTTP client.
//!
//! Lists rapid-transit routes and the stops along each one. Handles
//! authentication, concurrency limiting, and conversion to domain types.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::trace;

use crate::domain::{Line, LineId, StopName};

use super::error::FetchError;
use super::types::{Collection, RouteAttributes, StopAttributes, into_lines, into_stop_names};
use super::{DataFetcher, StopOrder};

/// Default base URL for the MBTA v3 API.
const DEFAULT_BASE_URL: &str = "https://api-v3.mbta.com";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Light rail (0) and heavy rail (1).
const RAPID_TRANSIT_TYPES: [u8; 2] = [0, 1];

/// Configuration for the MBTA client.
#[derive(Debug, Clone)]
pub struct MbtaConfig {
    /// Optional API key. Anonymous access works but is heavily rate limited.
    pub api_key: Option<String>,
    /// Base URL for the API
    pub base_url: String,
    /// Route types to list. Empty means every type.
    pub route_types: Vec<u8>,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl MbtaConfig {
    /// Create a config for the public API listing rapid-transit routes.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            route_types: RAPID_TRANSIT_TYPES.to_vec(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the route types to list.
    pub fn with_route_types(mut self, types: impl Into<Vec<u8>>) -> Self {
        self.route_types = types.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for MbtaConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

/// MBTA v3 API client.
///
/// Uses a semaphore to limit concurrent requests and avoid rate limiting.
#[derive(Debug, Clone)]
pub struct MbtaClient {
    http: reqwest::Client,
    base_url: String,
    route_types: Vec<u8>,
    semaphore: Arc<Semaphore>,
}

impl MbtaClient {
    /// Create a new MBTA client with the given configuration.
    pub fn new(config: MbtaConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            let value = HeaderValue::from_str(key).map_err(|_| FetchError::Api {
                status: 0,
                message: "Invalid API key format".to_string(),
            })?;
            headers.insert(HeaderName::from_static("x-api-key"), value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            route_types: config.route_types,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Query parameters for the routes listing.
    fn routes_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("sort", "long_name".to_string())];
        if !self.route_types.is_empty() {
            let types: Vec<String> = self.route_types.iter().map(u8::to_string).collect();
            query.push(("filter[type]", types.join(",")));
        }
        query
    }

    /// Query parameters for a stops listing.
    ///
    /// Without a sort parameter the API returns stops in route order.
    fn stops_query(line: &LineId, order: StopOrder) -> Vec<(&'static str, String)> {
        let mut query = vec![("filter[route]", line.as_str().to_string())];
        if order == StopOrder::ByName {
            query.push(("sort", "name".to_string()));
        }
        query
    }

    /// GET a JSON:API document and deserialize it.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, FetchError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| FetchError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}/{}", self.base_url, path);
        trace!(%url, ?query, "MBTA request");

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(FetchError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| FetchError::Json {
            message: e.to_string(),
        })
    }
}

impl DataFetcher for MbtaClient {
    async fn list_lines(&self) -> Result<Vec<Line>, FetchError> {
        let routes: Collection<RouteAttributes> =
            self.get_json("routes", &self.routes_query()).await?;
        Ok(into_lines(routes))
    }

    async fn list_stops(&self, line: &LineId, order: StopOrder) -> Result<Vec<StopName>, FetchError> {
        let stops: Collection<StopAttributes> = self
            .get_json("stops", &Self::stops_query(line, order))
            .await?;
        Ok(into_stop_names(stops))
    }
}
