//! Shared test utilities for command testing.
//!
//! Provides a factory wired to a wiremock server plus helpers that mount the
//! cache listing, cache deletion, and org usage endpoints.

use ghcache_core::iostreams::TestOutput;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::factory::Factory;

/// Token every harness request is expected to carry.
pub const TEST_TOKEN: &str = "ghp_test_token_123";

/// A fully-configured test harness with factory, output capture, and mock server.
#[derive(Debug)]
pub struct TestHarness {
    /// The factory configured for testing.
    pub factory: Factory,
    /// Captured stdout/stderr output.
    pub output: TestOutput,
    /// Wiremock mock server for API requests.
    pub server: MockServer,
}

impl TestHarness {
    /// Create a new test harness routing all API requests to a fresh mock server.
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let (factory, output) = Factory::test();
        let factory = factory
            .with_http_client(reqwest::Client::new())
            .with_api_url(format!("{}/", server.uri()));

        Self {
            factory,
            output,
            server,
        }
    }

    /// Get captured stdout as a string.
    pub fn stdout(&self) -> String {
        self.output.stdout()
    }

    /// Get captured stderr as a string.
    pub fn stderr(&self) -> String {
        self.output.stderr()
    }

    /// Number of requests the mock server received with the given method.
    pub async fn request_count(&self, http_method: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == http_method)
            .count()
    }
}

// --- Wiremock helpers ---

/// Build a single cache entry fixture.
pub fn cache_fixture(id: u64, key: &str, size_in_bytes: u64) -> Value {
    json!({
        "id": id,
        "ref": "refs/heads/main",
        "key": key,
        "version": "8d3b1a9e",
        "last_accessed_at": "2024-01-15T10:00:00Z",
        "created_at": "2024-01-14T10:00:00Z",
        "size_in_bytes": size_in_bytes
    })
}

/// Mount a cache listing that returns `entries` on the first pass only.
///
/// Page 1 answers with `entries` once, then with an empty list; page 2 is
/// always empty. A cleaner that deletes and re-lists therefore sees the
/// repository drained on its second pass.
pub async fn mock_cache_listing(server: &MockServer, repo: &str, entries: Vec<Value>) {
    let caches_path = format!("/repos/{repo}/actions/caches");

    Mock::given(method("GET"))
        .and(path(caches_path.as_str()))
        .and(query_param("page", "1"))
        .and(header("Authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": entries.len(),
            "actions_caches": entries,
        })))
        .up_to_n_times(1)
        .mount(server)
        .await;

    mock_empty_cache_pages(server, repo).await;
}

/// Mount a listing that always returns `entries`, no matter how often it is read.
pub async fn mock_stuck_cache_listing(server: &MockServer, repo: &str, entries: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/{repo}/actions/caches").as_str()))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": entries.len(),
            "actions_caches": entries,
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/repos/{repo}/actions/caches").as_str()))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_cache_list()))
        .mount(server)
        .await;
}

/// Mount an always-empty cache listing for `repo`.
pub async fn mock_empty_cache_pages(server: &MockServer, repo: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/{repo}/actions/caches").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_cache_list()))
        .mount(server)
        .await;
}

/// Mount a cache deletion for `key` answering with `status`.
pub async fn mock_cache_delete(server: &MockServer, repo: &str, key: &str, status: u16) {
    Mock::given(method("DELETE"))
        .and(path(format!("/repos/{repo}/actions/caches").as_str()))
        .and(query_param("key", key))
        .and(header("Authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Mount one page of the org usage-by-repository listing.
pub async fn mock_org_usage_page(server: &MockServer, org: &str, page: u32, repos: &[&str]) {
    let usages: Vec<Value> = repos
        .iter()
        .map(|name| {
            json!({
                "full_name": name,
                "active_caches_size_in_bytes": 4096,
                "active_caches_count": 2
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path(format!("/orgs/{org}/actions/cache/usage-by-repository").as_str()))
        .and(query_param("page", page.to_string().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": usages.len(),
            "repository_cache_usages": usages,
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn empty_cache_list() -> Value {
    json!({"total_count": 0, "actions_caches": []})
}
