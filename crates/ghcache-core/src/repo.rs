//! Repository and organization name parsing.

use std::fmt;

/// A GitHub repository identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repo {
    owner: String,
    name: String,
}

impl Repo {
    /// Create a new repo reference.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse an "OWNER/REPO" string.
    ///
    /// # Errors
    ///
    /// Returns an error unless the string has exactly two non-empty segments.
    pub fn from_full_name(nwo: &str) -> Result<Self, RepoParseError> {
        match nwo.trim().split('/').collect::<Vec<_>>().as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Self::new(*owner, *name)),
            _ => Err(RepoParseError::InvalidFormat(nwo.to_string())),
        }
    }

    /// Repository owner (user or organization).
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full name as "OWNER/REPO".
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Validate an organization login.
///
/// # Errors
///
/// Returns an error for empty names or names containing `/`.
pub fn parse_org(org: &str) -> Result<&str, RepoParseError> {
    let org = org.trim();
    if org.is_empty() || org.contains('/') {
        return Err(RepoParseError::InvalidOrg(org.to_string()));
    }
    Ok(org)
}

/// Errors from parsing repository and organization references.
#[derive(Debug, thiserror::Error)]
pub enum RepoParseError {
    /// String does not match `OWNER/REPO`.
    #[error("expected OWNER/REPO format, got {0:?}")]
    InvalidFormat(String),
    /// String is not a bare organization login.
    #[error("expected an organization name, got {0:?}")]
    InvalidOrg(String),
}
