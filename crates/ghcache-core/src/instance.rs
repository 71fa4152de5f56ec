//! Mapping from a GitHub hostname to its REST API root.

/// Hostname of the public GitHub cloud.
pub const GITHUB_COM: &str = "github.com";

/// Lower-case `host` and strip any scheme or trailing slashes.
pub fn normalize_hostname(host: &str) -> String {
    let bare = ["https://", "http://"]
        .iter()
        .find_map(|scheme| host.strip_prefix(scheme))
        .unwrap_or(host);
    bare.trim_end_matches('/').to_ascii_lowercase()
}

/// REST API root for `host`, ending in `/`.
///
/// github.com is served from `api.github.com`; Enterprise Server hosts serve
/// the API under `/api/v3/`.
pub fn rest_url(host: &str) -> String {
    match normalize_hostname(host).as_str() {
        GITHUB_COM => "https://api.github.com/".to_string(),
        other => format!("https://{other}/api/v3/"),
    }
}
