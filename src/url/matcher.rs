/// Checks if a domain matches a wildcard pattern
///
/// This function supports two types of patterns:
/// 1. Exact match: "afdb.fr" matches only "afdb.fr"
/// 2. Wildcard match: "*.afdb.fr" matches:
///    - "afdb.fr" (the bare domain)
///    - "www.afdb.fr" (single subdomain)
///    - "static.www.afdb.fr" (nested subdomains)
///
/// # Examples
///
/// ```
/// use afdb_crawler::url::matches_wildcard;
///
/// assert!(matches_wildcard("afdb.fr", "afdb.fr"));
/// assert!(!matches_wildcard("afdb.fr", "www.afdb.fr"));
///
/// assert!(matches_wildcard("*.afdb.fr", "afdb.fr"));
/// assert!(matches_wildcard("*.afdb.fr", "www.afdb.fr"));
/// assert!(!matches_wildcard("*.afdb.fr", "notafdb.fr"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    if let Some(base) = pattern.strip_prefix("*.") {
        candidate == base
            || candidate
                .strip_suffix(base)
                .is_some_and(|prefix| prefix.ends_with('.'))
    } else {
        candidate == pattern
    }
}

/// Checks a host against a list of allowed domain patterns
///
/// An empty pattern list allows every host.
pub fn is_allowed_host(host: &str, patterns: &[String]) -> bool {
    patterns.is_empty() || patterns.iter().any(|p| matches_wildcard(p, host))
}
