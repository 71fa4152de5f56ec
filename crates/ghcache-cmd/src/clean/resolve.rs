//! Turn an action and resource into the repositories to clean.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::debug;

use ghcache_api::client::Client;
use ghcache_api::queries::cache::org_cache_usage;
use ghcache_core::cmdutil::FlagError;
use ghcache_core::repo::{Repo, parse_org};

/// Scope of a cleaning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// A single repository given as `OWNER/REPO`.
    Repo,
    /// Every repository of an organization that holds caches.
    Org,
}

impl FromStr for Action {
    type Err = FlagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "repo" => Ok(Self::Repo),
            "org" => Ok(Self::Org),
            other => Err(FlagError(format!(
                "unknown action {other:?}: expected `repo` or `org`"
            ))),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repo => f.write_str("repo"),
            Self::Org => f.write_str("org"),
        }
    }
}

/// Validate `resource` for `action` without touching the network.
///
/// # Errors
///
/// Returns a [`FlagError`] when the resource does not fit the action.
pub fn validate_resource(action: Action, resource: &str) -> Result<(), FlagError> {
    let checked = match action {
        Action::Repo => Repo::from_full_name(resource).map(|_| ()),
        Action::Org => parse_org(resource).map(|_| ()),
    };
    checked.map_err(|e| FlagError(e.to_string()))
}

/// Resolve the repositories to clean, in order.
///
/// `repo` yields the resource itself without any request. `org` pages through
/// the organization's cache usage; an empty result is not an error.
///
/// # Errors
///
/// Returns an error for a malformed resource, or when any usage page fails.
pub async fn resolve_repos(client: &Client, action: Action, resource: &str) -> Result<Vec<Repo>> {
    validate_resource(action, resource)?;

    match action {
        Action::Repo => Ok(vec![Repo::from_full_name(resource)?]),
        Action::Org => {
            let org = parse_org(resource)?;
            let usage = org_cache_usage(client, org)
                .await
                .with_context(|| format!("failed to list cache usage for organization {org}"))?;
            debug!(org, repos = usage.len(), "Resolved organization repositories");

            usage
                .iter()
                .map(|u| {
                    Repo::from_full_name(&u.full_name)
                        .with_context(|| format!("unexpected repository name {:?}", u.full_name))
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use wiremock::matchers::any;
    use wiremock::{Mock, ResponseTemplate};

    use super::*;
    use crate::test_helpers::{TEST_TOKEN, TestHarness, mock_org_usage_page};

    fn client(h: &TestHarness) -> Client {
        h.factory
            .api_client("github.com", TEST_TOKEN.into(), None)
            .unwrap()
    }

    #[rstest]
    #[case("repo", Action::Repo)]
    #[case("org", Action::Org)]
    fn test_should_parse_action(#[case] input: &str, #[case] expected: Action) {
        assert_eq!(input.parse::<Action>().unwrap(), expected);
        assert_eq!(expected.to_string(), input);
    }

    #[rstest]
    #[case("user")]
    #[case("REPO")]
    #[case("")]
    fn test_should_reject_unknown_action(#[case] input: &str) {
        let err = input.parse::<Action>().unwrap_err();
        assert!(err.to_string().contains("expected `repo` or `org`"));
    }

    #[rstest]
    #[case(Action::Repo, "acme/widgets", true)]
    #[case(Action::Repo, "acme", false)]
    #[case(Action::Org, "acme", true)]
    #[case(Action::Org, "acme/widgets", false)]
    fn test_should_validate_resource(
        #[case] action: Action,
        #[case] resource: &str,
        #[case] ok: bool,
    ) {
        assert_eq!(validate_resource(action, resource).is_ok(), ok);
    }

    #[tokio::test]
    async fn test_should_resolve_repo_without_network() {
        let h = TestHarness::new().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&h.server)
            .await;

        let repos = resolve_repos(&client(&h), Action::Repo, "acme/widgets")
            .await
            .unwrap();
        assert_eq!(repos, vec![Repo::new("acme", "widgets")]);
    }

    #[tokio::test]
    async fn test_should_resolve_org_repos_in_server_order() {
        let h = TestHarness::new().await;
        mock_org_usage_page(&h.server, "acme", 1, &["acme/widgets", "acme/gadgets"]).await;
        mock_org_usage_page(&h.server, "acme", 2, &["acme/gizmos"]).await;
        mock_org_usage_page(&h.server, "acme", 3, &[]).await;

        let repos = resolve_repos(&client(&h), Action::Org, "acme").await.unwrap();
        let names: Vec<String> = repos.iter().map(Repo::full_name).collect();
        assert_eq!(names, vec!["acme/widgets", "acme/gadgets", "acme/gizmos"]);
    }

    #[tokio::test]
    async fn test_should_resolve_empty_org_without_error() {
        let h = TestHarness::new().await;
        mock_org_usage_page(&h.server, "acme", 1, &[]).await;

        let repos = resolve_repos(&client(&h), Action::Org, "acme").await.unwrap();
        assert!(repos.is_empty());
    }

    #[tokio::test]
    async fn test_should_abort_org_resolution_on_failure() {
        let h = TestHarness::new().await;
        mock_org_usage_page(&h.server, "acme", 1, &["acme/widgets"]).await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&h.server)
            .await;

        let err = resolve_repos(&client(&h), Action::Org, "acme")
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("HTTP 502"));
    }
}
