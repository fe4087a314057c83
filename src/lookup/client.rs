//! ipstack HTTP client
//!
//! Handles communication with the ipstack standard lookup endpoint.
//! See: https://ipstack.com/documentation
//!
//! ## Request Shape
//!
//! `GET {base_url}{query}?access_key={key}` where the query is an IP literal
//! or a hostname, percent-encoded as a single path segment.
//!
//! ## Errors In Successful Responses
//!
//! ipstack reports API-level failures (bad key, unresolvable address) with
//! HTTP 200 and an `error` object in the body, so the status code alone
//! doesn't tell us whether the lookup worked. Non-2xx statuses are still
//! treated as [`LookupError::Http`].
//!
//! One GET per call. No retries, no caching.

use std::time::Duration;

use parking_lot::RwLock;

use super::{adapter, dto};
use crate::config::{ApiConfig, DEFAULT_API_BASE_URL};
use crate::lookup::domain::LookupError;
use crate::model::GeolocationRecord;

/// ipstack API client
pub struct IpStackClient {
    api_key: RwLock<String>,
    http_client: reqwest::Client,
    base_url: String,
}

impl IpStackClient {
    /// Create a new client with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_config(&ApiConfig::default(), api_key)
    }

    /// Create a client from the `[api]` config section
    ///
    /// The client is configured to:
    /// - Time out requests after `timeout_secs`
    /// - Send User-Agent header identifying the application
    pub fn from_config(config: &ApiConfig, api_key: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            api_key: RwLock::new(api_key.into()),
            http_client,
            base_url: normalize_base_url(&config.base_url),
        }
    }

    /// Create a client with a custom base URL (mock servers, proxies)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let config = ApiConfig {
            base_url: base_url.into(),
            ..ApiConfig::default()
        };
        Self::from_config(&config, api_key)
    }

    /// The API key currently in use
    pub fn api_key(&self) -> String {
        self.api_key.read().clone()
    }

    /// Replace the API key used for subsequent requests
    pub fn set_api_key(&self, api_key: &str) {
        *self.api_key.write() = api_key.trim().to_string();
    }

    /// Look up an IP address or hostname
    pub async fn fetch(&self, query: &str) -> Result<GeolocationRecord, LookupError> {
        let response = self.send_lookup_request(query.trim()).await?;
        adapter::to_record(response)
    }

    /// Build the request URL for a query
    fn lookup_url(&self, query: &str, api_key: &str) -> String {
        format!(
            "{}{}?access_key={}",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(api_key)
        )
    }

    /// Send the HTTP request and parse the response body
    async fn send_lookup_request(&self, query: &str) -> Result<dto::LookupResponse, LookupError> {
        let api_key = self.api_key.read().clone();
        if api_key.trim().is_empty() {
            return Err(LookupError::MissingApiKey);
        }

        tracing::debug!("ipstack lookup: {}", query);
        let url = self.lookup_url(query, &api_key);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("ipstack returned HTTP {} for {}", status, query);
            return Err(LookupError::Http(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::Network(e.without_url().to_string()))?;

        serde_json::from_str::<dto::LookupResponse>(&body)
            .map_err(|e| LookupError::Parse(e.to_string()))
    }
}

/// Ensure the base URL ends with exactly one `/` so queries append cleanly
fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_API_BASE_URL.to_string()
    } else {
        format!("{}/", trimmed)
    }
}
