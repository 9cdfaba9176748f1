use crate::UrlError;
use url::Url;

/// Normalizes a URL into the key used by the duplicate filter
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed (the parser already lowercases the
///    host and resolves `.` and `..` path segments)
/// 2. Reject anything but HTTP(S)
/// 3. Remove the fragment
/// 4. Sort query parameters by key, keeping the order of repeated keys
/// 5. Remove an empty query string (trailing `?`)
///
/// Paths are otherwise left alone: the site's product URLs are case- and
/// slash-sensitive.
///
/// # Examples
///
/// ```
/// use afdb_crawler::url::normalize_url;
///
/// let url = normalize_url("https://WWW.AFDB.FR/a/../p.html?b=2&a=1#top").unwrap();
/// assert_eq!(url.as_str(), "https://www.afdb.fr/p.html?a=1&b=2");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    if url.query().is_some() {
        let mut params: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        // Stable sort keeps repeated keys in their original order
        params.sort_by(|a, b| a.0.cmp(&b.0));

        if params.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(params);
        }
    }

    Ok(url)
}
