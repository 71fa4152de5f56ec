//! Cache cleaning command.
//!
//! Resolves the repositories to clean, then sweeps each one in order. Any
//! error aborts the whole run; a repository that ends up with zero deletions
//! does not stop the repositories after it.

pub mod resolve;
pub mod sweep;

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use secrecy::SecretString;

use ghcache_api::errors::ApiError;
use ghcache_api::queries::cache::CacheEntry;
use ghcache_core::cmdutil::{AuthError, FlagError};
use ghcache_core::table::TablePrinter;
use ghcache_core::text::{format_size, pluralize, relative_time_str, truncate};
use ghcache_core::{IOStreams, Repo, ios_eprintln, ios_println};

use self::resolve::{Action, resolve_repos, validate_resource};
use self::sweep::{CleanReport, preview_repo, sweep_repo};

/// Maximum key width shown in dry-run tables on a terminal.
const KEY_WIDTH: usize = 60;

/// Delete GitHub Actions caches of a repository or of a whole organization.
#[derive(Debug, Args)]
pub struct CleanArgs {
    /// What to clean: `repo` or `org`.
    #[arg(value_name = "ACTION")]
    pub action: String,

    /// OWNER/REPO for `repo`, OWNER for `org`.
    #[arg(value_name = "RESOURCE")]
    pub resource: String,

    /// GitHub API token (falls back to GH_TOKEN, then GITHUB_TOKEN).
    #[arg(value_name = "TOKEN", env = "GH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub hostname to talk to.
    #[arg(long, env = "GH_HOST", default_value = "github.com")]
    pub hostname: String,

    /// List the caches that would be deleted without deleting them.
    #[arg(long)]
    pub dry_run: bool,

    /// Per-request timeout in seconds.
    #[arg(long, env = "GHCACHE_TIMEOUT", value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

/// Totals across every repository of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanSummary {
    /// Per-repository reports, in processing order.
    pub reports: Vec<CleanReport>,
}

impl CleanSummary {
    /// Total caches removed.
    pub fn removed(&self) -> u64 {
        self.reports.iter().map(|r| r.removed).sum()
    }

    /// Total bytes freed.
    pub fn bytes_freed(&self) -> u64 {
        self.reports.iter().map(|r| r.bytes_freed).sum()
    }
}

impl CleanArgs {
    /// Run the clean command.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown action, a malformed resource, a
    /// missing token, or any API failure.
    pub async fn run(&self, factory: &crate::factory::Factory) -> Result<CleanSummary> {
        let action: Action = self.action.parse()?;
        validate_resource(action, &self.resource)?;
        let token = self.resolve_token()?;

        let client = factory.api_client(
            &self.hostname,
            token,
            self.timeout.map(Duration::from_secs),
        )?;
        let ios = &factory.io;

        let repos = resolve_repos(&client, action, &self.resource)
            .await
            .map_err(promote_auth_error)?;
        let mut summary = CleanSummary::default();

        if repos.is_empty() {
            ios_eprintln!(ios, "{} has no action caches", self.resource);
            return Ok(summary);
        }

        for repo in &repos {
            let report = if self.dry_run {
                let (report, entries) = preview_repo(&client, repo)
                    .await
                    .map_err(|e| api_failure(e, "list caches", repo))?;
                print_entries(ios, &entries);
                report
            } else {
                sweep_repo(&client, repo)
                    .await
                    .map_err(|e| api_failure(e, "clean caches", repo))?
            };
            print_report(ios, &report, self.dry_run);
            summary.reports.push(report);
        }

        if action == Action::Org {
            print_summary(ios, &summary, self.dry_run);
        }

        Ok(summary)
    }

    fn resolve_token(&self) -> Result<SecretString> {
        self.token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()))
            .map(SecretString::from)
            .ok_or_else(|| {
                FlagError("missing TOKEN argument (or set GH_TOKEN / GITHUB_TOKEN)".to_string())
                    .into()
            })
    }
}

/// Wrap an API failure with the repository it hit; rejected tokens become [`AuthError`].
fn api_failure(err: ApiError, what: &str, repo: &Repo) -> anyhow::Error {
    let context = format!("failed to {what} for {repo}");
    if err.is_unauthorized() {
        anyhow::Error::new(AuthError(err.to_string())).context(context)
    } else {
        anyhow::Error::new(err).context(context)
    }
}

fn promote_auth_error(err: anyhow::Error) -> anyhow::Error {
    let message = err
        .chain()
        .find_map(|e| e.downcast_ref::<ApiError>())
        .filter(|e| e.is_unauthorized())
        .map(ToString::to_string);
    match message {
        Some(message) => anyhow::Error::new(AuthError(message)).context(err.to_string()),
        None => err,
    }
}

fn print_entries(ios: &IOStreams, entries: &[CacheEntry]) {
    if entries.is_empty() {
        return;
    }

    let is_tty = ios.is_stdout_tty();
    let mut tp = TablePrinter::new(ios).with_headers(&["id", "key", "ref", "size", "last accessed"]);
    for entry in entries {
        let key = if is_tty {
            truncate(&entry.key, KEY_WIDTH)
        } else {
            entry.key.clone()
        };
        tp.add_row(vec![
            entry.id.to_string(),
            key,
            entry.git_ref.clone(),
            format_size(entry.size_in_bytes),
            relative_time_str(&entry.last_accessed_at, is_tty),
        ]);
    }
    ios_println!(ios, "{}", tp.render());
}

#[allow(clippy::cast_possible_wrap)]
fn print_report(ios: &IOStreams, report: &CleanReport, dry_run: bool) {
    let cs = ios.color_scheme();
    let caches = pluralize(report.removed as i64, "cache", "caches");
    if dry_run {
        ios_println!(
            ios,
            "{} Would remove {caches} from {} ({})",
            cs.warning_icon(),
            cs.bold(&report.repo.full_name()),
            format_size(report.bytes_freed),
        );
    } else if report.removed == 0 {
        ios_println!(
            ios,
            "{} Removed {caches} from {}",
            cs.gray("-"),
            cs.bold(&report.repo.full_name()),
        );
    } else {
        ios_println!(
            ios,
            "{} Removed {caches} from {} ({} freed)",
            cs.success_icon(),
            cs.bold(&report.repo.full_name()),
            format_size(report.bytes_freed),
        );
    }
}

#[allow(clippy::cast_possible_wrap)]
fn print_summary(ios: &IOStreams, summary: &CleanSummary, dry_run: bool) {
    let caches = pluralize(summary.removed() as i64, "cache", "caches");
    let repos = pluralize(summary.reports.len() as i64, "repository", "repositories");
    let verb = if dry_run { "Would remove" } else { "Removed" };
    ios_println!(
        ios,
        "{verb} {caches} across {repos} ({})",
        format_size(summary.bytes_freed()),
    );
}
