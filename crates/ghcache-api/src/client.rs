//! Authenticated GitHub REST client.
//!
//! Every request carries `Authorization: Bearer <token>`. Responses pass
//! through two gates: [`Client::rest`] requires a success status and decodes
//! the body, while [`Client::rest_status`] only rejects auth and rate-limit
//! failures and hands the status back to the caller.

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::ApiError;
use crate::http::auth_header_value;
use ghcache_core::instance;

/// Page size requested from paginated endpoints (the API maximum).
pub const PER_PAGE: u32 = 100;

/// GitHub API client wrapping reqwest with auth and error handling.
///
/// Tokens are stored as [`SecretString`] to prevent accidental logging or
/// exposure through `Debug` output.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    hostname: String,
    token: SecretString,
    /// Optional base URL override for testing (e.g., `"http://127.0.0.1:PORT/"`).
    api_url_override: Option<String>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("hostname", &self.hostname)
            .field("token", &"[REDACTED]")
            .field("api_url_override", &self.api_url_override)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a new API client for a specific hostname.
    pub fn new(http: reqwest::Client, hostname: &str, token: SecretString) -> Self {
        Self {
            http,
            hostname: instance::normalize_hostname(hostname),
            token,
            api_url_override: None,
        }
    }

    /// Set a base URL override for testing.
    ///
    /// The URL should include the trailing slash, e.g., `"http://127.0.0.1:8080/"`.
    #[must_use]
    pub fn with_url_override(mut self, url: String) -> Self {
        self.api_url_override = Some(url);
        self
    }

    /// Get the hostname this client is configured for.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Execute a REST request and decode the JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, non-success status, or a body
    /// that does not decode into `T`.
    pub async fn rest<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> Result<T, ApiError> {
        let url = self.resolve_rest_url(path);
        debug!(%method, %url, "Sending request");
        let resp = self.authed_request(method, &url).send().await?;
        let resp = Self::check_response(resp).await?;
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Execute a REST request and return its status without judging it.
    ///
    /// Only authentication and rate-limit failures become errors; every other
    /// status, including 404, is returned for the caller to interpret.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, 401/403, or rate limiting.
    pub async fn rest_status(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> Result<StatusCode, ApiError> {
        let url = self.resolve_rest_url(path);
        debug!(%method, %url, "Sending request");
        let resp = self.authed_request(method, &url).send().await?;
        let resp = Self::check_auth(resp).await?;
        Ok(resp.status())
    }

    /// Collect all pages from a page-numbered REST endpoint.
    ///
    /// Requests `page=1, 2, ...` with `per_page=100` and stops at the first
    /// page whose extracted item list is empty. Items keep server order.
    ///
    /// # Errors
    ///
    /// Returns the first error hit on any page; no partial result is returned.
    pub async fn rest_pages<P, T, F>(&self, path: &str, mut items: F) -> Result<Vec<T>, ApiError>
    where
        P: DeserializeOwned,
        F: FnMut(P) -> Vec<T>,
    {
        let sep = if path.contains('?') { '&' } else { '?' };
        let mut all_items = Vec::new();

        for page in 1u32.. {
            let page_path = format!("{path}{sep}per_page={PER_PAGE}&page={page}");
            let batch = items(self.rest(reqwest::Method::GET, &page_path).await?);
            debug!(page, count = batch.len(), "Fetched page");
            if batch.is_empty() {
                break;
            }
            all_items.extend(batch);
        }

        Ok(all_items)
    }

    /// Build a request with the bearer token applied.
    fn authed_request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http.request(method, url).header(
            reqwest::header::AUTHORIZATION,
            auth_header_value(self.token.expose_secret()),
        )
    }

    /// Reject 401/403 as auth failures, and 403/429 with an exhausted quota as
    /// rate limiting. Any other response passes through.
    async fn check_auth(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if !matches!(
            status,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
        ) {
            return Ok(resp);
        }

        if let Some(reset_at) = rate_limit_reset(resp.headers()) {
            return Err(ApiError::RateLimited { reset_at });
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Ok(resp);
        }

        let message = resp.text().await.unwrap_or_default();
        Err(ApiError::Unauthorized {
            status: status.as_u16(),
            message: api_message(&message),
        })
    }

    /// Like [`check_auth`](Self::check_auth), then require a success status.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let resp = Self::check_auth(resp).await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let text = resp.text().await.unwrap_or_default();
        Err(ApiError::Http {
            status: status.as_u16(),
            message: api_message(&text),
        })
    }

    fn resolve_rest_url(&self, path: &str) -> String {
        if path.starts_with("https://") || path.starts_with("http://") {
            path.to_string()
        } else {
            let base = match self.api_url_override {
                Some(ref url) => url.clone(),
                None => instance::rest_url(&self.hostname),
            };
            format!("{base}{}", path.trim_start_matches('/'))
        }
    }
}

/// Return the reset time when the response reports an exhausted rate limit.
fn rate_limit_reset(headers: &HeaderMap) -> Option<String> {
    let remaining = headers.get("x-ratelimit-remaining")?.to_str().ok()?;
    if remaining.trim() != "0" {
        return None;
    }

    let reset_at = headers
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i64>().ok())
        .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
        .map_or_else(
            || "unknown".to_string(),
            |dt| dt.format("%H:%M:%S UTC").to_string(),
        );
    Some(reset_at)
}

/// Pull the `message` field out of a GitHub error body, falling back to the raw text.
fn api_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
