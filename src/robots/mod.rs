//! Robots.txt handling module
//!
//! Robots.txt is fetched once per origin, cached for a day in the domain's
//! [`DomainState`](crate::state::DomainState) and only consulted for page
//! requests.

mod cache;
mod parser;

pub use cache::{CachedRobots, ROBOTS_TTL_HOURS};
pub use parser::ParsedRobots;

use reqwest::Client;
use url::Url;

/// Location of robots.txt for the origin of `url`
pub fn robots_url(url: &Url) -> Option<Url> {
    url.join("/robots.txt").ok()
}

/// Fetches and parses robots.txt for the origin of `url`
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - Any URL on the site
///
/// # Returns
///
/// The parsed rules. A robots.txt that cannot be fetched or answers with a
/// non-2xx status yields rules that allow everything.
pub async fn fetch_robots(client: &Client, url: &Url) -> ParsedRobots {
    let Some(robots_url) = robots_url(url) else {
        return ParsedRobots::allow_all();
    };

    let response = match client.get(robots_url.as_str()).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("robots.txt unavailable at {}: {}", robots_url, e);
            return ParsedRobots::allow_all();
        }
    };

    if !response.status().is_success() {
        tracing::debug!(
            "robots.txt at {} returned {}, allowing all",
            robots_url,
            response.status()
        );
        return ParsedRobots::allow_all();
    }

    match response.text().await {
        Ok(body) => ParsedRobots::from_content(&body),
        Err(e) => {
            tracing::debug!("Failed to read robots.txt at {}: {}", robots_url, e);
            ParsedRobots::allow_all()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_robots_url_from_deep_page() {
        let url = Url::parse("https://www.afdb.fr/a/b/c-SKU1.html?x=1#f").unwrap();
        assert_eq!(
            robots_url(&url).unwrap().as_str(),
            "https://www.afdb.fr/robots.txt"
        );
    }

    #[test]
    fn test_robots_url_keeps_port() {
        let url = Url::parse("http://127.0.0.1:8080/p.html").unwrap();
        assert_eq!(
            robots_url(&url).unwrap().as_str(),
            "http://127.0.0.1:8080/robots.txt"
        );
    }
}
