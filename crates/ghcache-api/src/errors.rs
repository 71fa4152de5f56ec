//! API error types.

/// Errors returned by the GitHub REST client.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Non-success HTTP response other than an auth or rate-limit failure.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body returned by the API.
        message: String,
    },

    /// The token was rejected (401) or lacks access (403).
    #[error("HTTP {status}: {message} (check that the token is valid and can manage Actions caches)")]
    Unauthorized {
        /// HTTP status code (401 or 403).
        status: u16,
        /// Response body returned by the API.
        message: String,
    },

    /// The primary rate limit is exhausted.
    #[error("API rate limit exceeded, resets at {reset_at}")]
    RateLimited {
        /// Human-readable reset time.
        reset_at: String,
    },

    /// Network/transport error.
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    /// Response body is not valid JSON or not the expected shape.
    #[error("failed to parse API response: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl ApiError {
    /// Status code carried by the error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } | Self::Unauthorized { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this is a 404 Not Found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }

    /// Check if the token was rejected or lacks permission.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Check if this is a rate-limit error.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}
