//! URL helpers shared by the resolver, the probe and the image rewriter

/// Build health URL: normalize(base_url) + "/health"
///
/// # Examples
/// - `http://10.0.0.5:8000` → `http://10.0.0.5:8000/health`
/// - `https://api.example.com/backend/` → `https://api.example.com/backend/health`
pub fn build_health_url(base_url: &str) -> String {
    format!("{}/health", normalize_base_url(base_url))
}

/// Normalize base URL by trimming trailing slashes
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// True when `path` already carries an `http://` or `https://` scheme
///
/// Case-insensitive on the scheme only; no further validation.
pub fn is_absolute_http_url(path: &str) -> bool {
    let lower = path
        .get(..8)
        .map(|prefix| prefix.to_ascii_lowercase())
        .unwrap_or_else(|| path.to_ascii_lowercase());
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Loopback host names as reported by `Url::host_str`
pub fn is_loopback_host(host: &str) -> bool {
    matches!(
        host.to_ascii_lowercase().as_str(),
        "localhost" | "127.0.0.1" | "::1" | "[::1]"
    )
}
