//! Link discovery in fetched pages
//!
//! Links are taken from `<a href>` and `<area href>` elements, resolved
//! against the page URL and deduplicated per page in document order.

use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static LINK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a[href], area[href]").expect("static selector must parse")
});

/// Extracts all followable links from a parsed page
///
/// # Example
///
/// ```
/// use afdb_crawler::crawler::extract_links;
/// use scraper::Html;
/// use url::Url;
///
/// let html = Html::parse_document(r#"<a href="/outillage.html">Outillage</a>"#);
/// let base = Url::parse("https://www.afdb.fr/").unwrap();
/// let links = extract_links(&html, &base);
/// assert_eq!(links[0].as_str(), "https://www.afdb.fr/outillage.html");
/// ```
pub fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let mut seen = HashSet::new();

    document
        .select(&LINK)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .filter(|url| seen.insert(url.as_str().to_string()))
        .collect()
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only anchors
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    let mut absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() != "http" && absolute_url.scheme() != "https" {
        return None;
    }

    absolute_url.set_fragment(None);
    Some(absolute_url)
}
