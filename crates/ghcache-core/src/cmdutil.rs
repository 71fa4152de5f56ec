//! Command-level error types.
//!
//! The binary downcasts to these to pick an exit code.

/// Error indicating a bad command-line value (unknown action, malformed resource).
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct FlagError(pub String);

/// Auth error - triggers exit 4.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct AuthError(pub String);

/// Check if an error chain carries a [`FlagError`].
pub fn is_flag_error(err: &anyhow::Error) -> bool {
    err.downcast_ref::<FlagError>().is_some()
}

/// Check if an error chain carries an [`AuthError`].
pub fn is_auth_error(err: &anyhow::Error) -> bool {
    err.chain().any(|e| e.downcast_ref::<AuthError>().is_some())
}
