//! HTTP client construction.
//!
//! Provides the default headers GitHub expects (User-Agent, Accept, API
//! version) and the optional request timeout.

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use tracing::debug;

/// REST API version pinned in every request.
pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// Options for constructing an HTTP client.
#[derive(Debug, Default)]
pub struct HttpClientOptions {
    /// Application version for User-Agent.
    pub app_version: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Enable verbose HTTP logging.
    pub log_verbose: bool,
}

/// Build a reqwest client with default configuration.
///
/// # Errors
///
/// Returns an error if the client cannot be constructed.
pub fn build_client(opts: &HttpClientOptions) -> anyhow::Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        HeaderValue::from_str(&format!("ghcache/{}", opts.app_version))?,
    );
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    headers.insert(
        "X-GitHub-Api-Version",
        HeaderValue::from_static(GITHUB_API_VERSION),
    );

    if opts.log_verbose {
        debug!(timeout = ?opts.timeout, "Building HTTP client with verbose logging");
    }

    let mut builder = reqwest::Client::builder().default_headers(headers);
    if let Some(timeout) = opts.timeout {
        builder = builder.timeout(timeout);
    }

    Ok(builder.build()?)
}

/// Format an authorization header value from a token.
pub fn auth_header_value(token: &str) -> String {
    format!("Bearer {token}")
}
