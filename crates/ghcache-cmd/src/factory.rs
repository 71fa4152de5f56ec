//! Factory for shared command dependencies.
//!
//! Provides I/O streams and API clients to commands. Supports test mode with
//! dependency injection of the HTTP client and API base URL.

use std::time::Duration;

use ghcache_api::client::Client;
use ghcache_api::http::{HttpClientOptions, build_client};
use ghcache_core::iostreams::{IOStreams, TestOutput};
use secrecy::SecretString;

/// Shared factory providing dependencies to commands.
pub struct Factory {
    /// Application version.
    pub app_version: String,
    /// I/O streams.
    pub io: IOStreams,

    // Test overrides
    http_override: Option<reqwest::Client>,
    api_url_override: Option<String>,
}

impl std::fmt::Debug for Factory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Factory")
            .field("app_version", &self.app_version)
            .finish_non_exhaustive()
    }
}

impl Factory {
    /// Create a new factory with the given version.
    pub fn new(app_version: String) -> Self {
        Self {
            app_version,
            io: IOStreams::system(),
            http_override: None,
            api_url_override: None,
        }
    }

    /// Create a test factory with captured I/O.
    ///
    /// Returns the factory and a `TestOutput` for reading captured
    /// stdout/stderr.
    pub fn test() -> (Self, TestOutput) {
        let (io, output) = IOStreams::test_with_output();

        let factory = Self {
            app_version: "test".to_string(),
            io,
            http_override: None,
            api_url_override: None,
        };

        (factory, output)
    }

    /// Set a custom reqwest HTTP client (e.g., backed by wiremock).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_override = Some(client);
        self
    }

    /// Set an API URL override (wiremock server URI with trailing slash).
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url_override = Some(url.into());
        self
    }

    /// Build an API client for a hostname, authenticated with `token`.
    ///
    /// In test mode, uses the injected HTTP client and URL override.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn api_client(
        &self,
        hostname: &str,
        token: SecretString,
        timeout: Option<Duration>,
    ) -> anyhow::Result<Client> {
        let http = if let Some(ref client) = self.http_override {
            client.clone()
        } else {
            let opts = HttpClientOptions {
                app_version: self.app_version.clone(),
                timeout,
                log_verbose: std::env::var("GH_DEBUG").is_ok(),
            };
            build_client(&opts)?
        };

        let mut client = Client::new(http, hostname, token);
        if let Some(ref url) = self.api_url_override {
            client = client.with_url_override(url.clone());
        }
        Ok(client)
    }
}
