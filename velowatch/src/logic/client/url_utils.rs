//! Utility functions for building the station map resource URL.
//! Supports both traditional host:port format and full base URLs.

use anyhow::Context;
use url::Url;

/// Build the resource URL from either a base URL or a host/port combination
///
/// If base_url is provided, it takes precedence and should include the
/// protocol. Otherwise, constructs the URL from host and port using http as
/// the default protocol. The path always gets a leading slash.
pub fn build_resource_url(base_url: Option<&str>, host: &str, port: u16, path: &str) -> String {
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };

    if let Some(base) = base_url {
        format!("{}{}", base.trim_end_matches('/'), path)
    } else if host.starts_with("http://") || host.starts_with("https://") {
        // Host already includes protocol, use as-is
        format!("{}{}", host.trim_end_matches('/'), path)
    } else {
        format!("http://{}:{}{}", host, port, path)
    }
}

/// Build and validate the resource URL before handing it to the HTTP client
pub fn parse_resource_url(
    base_url: Option<&str>,
    host: &str,
    port: u16,
    path: &str,
) -> anyhow::Result<Url> {
    let raw = build_resource_url(base_url, host, port, path);
    Url::parse(&raw).with_context(|| format!("invalid resource URL `{}`", raw))
}
