//! Joining the configured backend address with endpoint paths.

/// Strip trailing slashes so endpoints can be appended with a single `/`.
///
/// # Examples
///
/// ```
/// use mindease::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:8000/"), "http://localhost:8000");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Build the full URL for `endpoint` under `base_url`.
///
/// # Examples
///
/// ```
/// use mindease::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:8000/", "/chat"),
///     "http://localhost:8000/chat"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{normalized_base}/{endpoint}")
}
