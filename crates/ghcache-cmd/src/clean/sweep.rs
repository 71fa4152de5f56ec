//! Per-repository sweep: list caches, delete them by key, repeat until drained.

use tracing::{info, warn};

use ghcache_api::client::Client;
use ghcache_api::errors::ApiError;
use ghcache_api::queries::cache::{CacheEntry, delete_cache_by_key, list_caches};
use ghcache_core::Repo;

/// Outcome of cleaning one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanReport {
    /// Repository that was processed.
    pub repo: Repo,
    /// Caches the API confirmed as deleted (or that would be, in a dry run).
    pub removed: u64,
    /// Bytes held by the removed caches.
    pub bytes_freed: u64,
}

impl CleanReport {
    fn new(repo: Repo) -> Self {
        Self {
            repo,
            removed: 0,
            bytes_freed: 0,
        }
    }
}

/// Delete every cache of `repo`.
///
/// Each pass lists the repository and deletes every listed key in order.
/// Passes repeat until the listing comes back empty, or until a pass deletes
/// nothing at all, in which case the leftovers are reported and abandoned.
///
/// # Errors
///
/// Returns the first listing or deletion error; nothing is retried.
pub async fn sweep_repo(client: &Client, repo: &Repo) -> Result<CleanReport, ApiError> {
    let mut report = CleanReport::new(repo.clone());

    for pass in 1u32.. {
        let entries = list_caches(client, repo).await?;
        if entries.is_empty() {
            break;
        }

        let mut removed_this_pass = 0u64;
        for entry in &entries {
            if delete_cache_by_key(client, repo, &entry.key).await? {
                info!(repo = %repo, key = %entry.key, "Deleted cache");
                removed_this_pass += 1;
                report.bytes_freed += entry.size_in_bytes;
            } else {
                warn!(repo = %repo, key = %entry.key, "Cache was not deleted");
            }
        }
        report.removed += removed_this_pass;

        if removed_this_pass == 0 {
            warn!(
                repo = %repo,
                pass,
                remaining = entries.len(),
                "No caches deleted in this pass, leaving the rest in place"
            );
            break;
        }
    }

    Ok(report)
}

/// List the caches a sweep of `repo` would delete, without deleting anything.
///
/// # Errors
///
/// Returns an error if the listing fails.
pub async fn preview_repo(
    client: &Client,
    repo: &Repo,
) -> Result<(CleanReport, Vec<CacheEntry>), ApiError> {
    let entries = list_caches(client, repo).await?;
    let report = CleanReport {
        repo: repo.clone(),
        removed: entries.len() as u64,
        bytes_freed: entries.iter().map(|e| e.size_in_bytes).sum(),
    };
    Ok((report, entries))
}
