//! GitHub Actions cache endpoints.
//!
//! - list a repository's caches, oldest first, across all pages
//! - delete caches by key
//! - page through an organization's cache usage per repository

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::Client;
use crate::errors::ApiError;
use ghcache_core::Repo;

/// A single Actions cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Cache ID.
    pub id: u64,
    /// Git ref the cache is scoped to.
    #[serde(rename = "ref", default)]
    pub git_ref: String,
    /// Cache key.
    pub key: String,
    /// Cache version hash.
    #[serde(default)]
    pub version: String,
    /// Last accessed timestamp (ISO-8601).
    #[serde(default)]
    pub last_accessed_at: String,
    /// Created timestamp (ISO-8601).
    #[serde(default)]
    pub created_at: String,
    /// Size in bytes.
    #[serde(default)]
    pub size_in_bytes: u64,
}

/// Response envelope of the repository cache listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheList {
    /// Total number of caches in the repository.
    #[serde(default)]
    pub total_count: u64,
    /// Entries on this page.
    pub actions_caches: Vec<CacheEntry>,
}

/// Cache usage of one repository in an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryCacheUsage {
    /// Repository full name (`OWNER/REPO`).
    pub full_name: String,
    /// Bytes held by active caches.
    #[serde(default)]
    pub active_caches_size_in_bytes: u64,
    /// Number of active caches.
    #[serde(default)]
    pub active_caches_count: u64,
}

/// Response envelope of the organization usage-by-repository listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryCacheUsageList {
    /// Total number of repositories with cache usage.
    #[serde(default)]
    pub total_count: u64,
    /// Repositories on this page.
    pub repository_cache_usages: Vec<RepositoryCacheUsage>,
}

fn caches_path(repo: &Repo) -> String {
    format!("repos/{}/{}/actions/caches", repo.owner(), repo.name())
}

/// List every active cache of a repository, oldest first.
///
/// # Errors
///
/// Returns an error if any page fails to load or decode.
pub async fn list_caches(client: &Client, repo: &Repo) -> Result<Vec<CacheEntry>, ApiError> {
    let path = format!("{}?sort=created_at&direction=asc", caches_path(repo));
    let entries = client
        .rest_pages(&path, |page: CacheList| page.actions_caches)
        .await?;
    debug!(repo = %repo, count = entries.len(), "Listed caches");
    Ok(entries)
}

/// Delete the caches matching `key` in a repository.
///
/// Returns `true` only when the API answers 200; any other status, such as
/// 404 for a key that is already gone, yields `false`.
///
/// # Errors
///
/// Returns an error on transport failure or when the token is rejected.
pub async fn delete_cache_by_key(
    client: &Client,
    repo: &Repo,
    key: &str,
) -> Result<bool, ApiError> {
    let path = format!("{}?key={}", caches_path(repo), urlencoding::encode(key));
    let status = client.rest_status(Method::DELETE, &path).await?;
    debug!(repo = %repo, key, %status, "Delete cache");
    Ok(status == StatusCode::OK)
}

/// List the repositories of an organization that have cache usage, in server order.
///
/// # Errors
///
/// Returns an error if any page fails to load or decode.
pub async fn org_cache_usage(
    client: &Client,
    org: &str,
) -> Result<Vec<RepositoryCacheUsage>, ApiError> {
    let path = format!("orgs/{org}/actions/cache/usage-by-repository");
    client
        .rest_pages(&path, |page: RepositoryCacheUsageList| {
            page.repository_cache_usages
        })
        .await
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_should_deserialize_cache_list() {
        let json = r#"{
            "total_count": 1,
            "actions_caches": [{
                "id": 505,
                "ref": "refs/heads/main",
                "key": "Linux-node-958aff96db2d75d67787d1e634ae70b659de937b",
                "version": "73885106f58cc52a7df9ec4d4a5622a5614813162cb516c759a30af6bf56e6f0",
                "last_accessed_at": "2019-01-24T22:45:36.000Z",
                "created_at": "2019-01-24T22:45:36.000Z",
                "size_in_bytes": 1024
            }]
        }"#;
        let list: CacheList = serde_json::from_str(json).unwrap();
        assert_eq!(list.total_count, 1);
        let entry = &list.actions_caches[0];
        assert_eq!(entry.id, 505);
        assert_eq!(entry.git_ref, "refs/heads/main");
        assert_eq!(entry.size_in_bytes, 1024);
    }

    #[test]
    fn test_should_deserialize_empty_cache_list() {
        let list: CacheList =
            serde_json::from_str(r#"{"total_count":0,"actions_caches":[]}"#).unwrap();
        assert!(list.actions_caches.is_empty());
    }

    #[test]
    fn test_should_reject_listing_without_caches_array() {
        let err = serde_json::from_str::<CacheList>(r#"{"message":"Not Found"}"#).unwrap_err();
        assert!(err.to_string().contains("actions_caches"));
    }

    #[test]
    fn test_should_deserialize_usage_list() {
        let json = r#"{
            "total_count": 2,
            "repository_cache_usages": [
                {"full_name": "acme/widgets", "active_caches_size_in_bytes": 2322142, "active_caches_count": 3},
                {"full_name": "acme/gadgets", "active_caches_size_in_bytes": 10, "active_caches_count": 1}
            ]
        }"#;
        let list: RepositoryCacheUsageList = serde_json::from_str(json).unwrap();
        let names: Vec<_> = list
            .repository_cache_usages
            .iter()
            .map(|u| u.full_name.as_str())
            .collect();
        assert_eq!(names, vec!["acme/widgets", "acme/gadgets"]);
        assert_eq!(list.repository_cache_usages[0].active_caches_count, 3);
    }

    #[test]
    fn test_should_build_caches_path() {
        assert_eq!(
            caches_path(&Repo::new("acme", "widgets")),
            "repos/acme/widgets/actions/caches"
        );
    }
}
