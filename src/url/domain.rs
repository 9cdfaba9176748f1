use url::Url;

/// Extracts the lowercase host of a URL
///
/// # Arguments
///
/// * `url` - The URL to read the host from
///
/// # Returns
///
/// * `Some(String)` - The lowercase host, without port
/// * `None` - If the URL has no host, which never occurs for HTTP(S)
///
/// # Examples
///
/// ```
/// use url::Url;
/// use afdb_crawler::url::extract_domain;
///
/// let url = Url::parse("https://WWW.AFDB.FR/outillage.html").unwrap();
/// assert_eq!(extract_domain(&url), Some("www.afdb.fr".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}
