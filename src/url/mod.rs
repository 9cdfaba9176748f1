//! URL handling module
//!
//! This module provides the link classifier that decides which discovered
//! links are followed and which pages are product pages, together with URL
//! normalization for the duplicate filter and allowed-domain matching.

mod domain;
mod matcher;
mod normalize;

use crate::config::LinkRules;

// Re-export main functions
pub use domain::extract_domain;
pub use matcher::{is_allowed_host, matches_wildcard};
pub use normalize::normalize_url;

/// Outcome of classifying a URL against the link rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkDecision {
    /// The link should be scheduled for fetching
    pub follow: bool,
    /// The page should be handed to the field extractor once fetched
    pub product: bool,
}

impl LinkDecision {
    /// A decision that neither follows nor extracts
    pub const SKIP: Self = Self {
        follow: false,
        product: false,
    };
}

/// Returns true if the link should be followed
///
/// A link is followed when it ends with one of the follow suffixes or
/// contains the product marker, and contains none of the deny markers.
///
/// # Examples
///
/// ```
/// use afdb_crawler::config::LinkRules;
/// use afdb_crawler::url::should_follow;
///
/// let rules = LinkRules::default();
/// assert!(should_follow("https://www.afdb.fr/outillage.html", &rules));
/// assert!(should_follow("https://www.afdb.fr/p?SKU=12", &rules));
/// assert!(!should_follow("https://www.afdb.fr/INTERSHOP/web/x.html", &rules));
/// ```
pub fn should_follow(url: &str, rules: &LinkRules) -> bool {
    let allowed = rules
        .follow_suffixes
        .iter()
        .any(|suffix| url.ends_with(suffix.as_str()))
        || url.contains(rules.product_marker.as_str());

    allowed && !rules.deny_markers.iter().any(|m| url.contains(m.as_str()))
}

/// Returns true if a fetched page at this URL is a product page
pub fn is_product_page(url: &str, rules: &LinkRules) -> bool {
    url.contains(rules.product_marker.as_str())
}

/// Classifies a discovered link
///
/// Links off the allowed domains are skipped outright. Otherwise the follow
/// rule and the product rule are applied to the full URL string. A product
/// decision is only ever reported for a followed link.
///
/// # Arguments
///
/// * `url` - The absolute link URL
/// * `rules` - The configured link rules
/// * `allowed_domains` - Domain patterns links must stay on (empty allows all)
pub fn classify_link(url: &::url::Url, rules: &LinkRules, allowed_domains: &[String]) -> LinkDecision {
    let Some(host) = extract_domain(url) else {
        return LinkDecision::SKIP;
    };

    if !is_allowed_host(&host, allowed_domains) {
        return LinkDecision::SKIP;
    }

    let url = url.as_str();
    let follow = should_follow(url, rules);

    LinkDecision {
        follow,
        product: follow && is_product_page(url, rules),
    }
}
