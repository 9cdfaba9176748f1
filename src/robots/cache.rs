use crate::robots::ParsedRobots;
use chrono::{DateTime, Duration, Utc};

/// How long fetched robots.txt rules stay valid
pub const ROBOTS_TTL_HOURS: i64 = 24;

/// Robots.txt rules together with the time they were fetched
#[derive(Debug, Clone)]
pub struct CachedRobots {
    /// The parsed robots.txt rules
    pub rules: ParsedRobots,

    /// When the robots.txt was fetched
    pub fetched_at: DateTime<Utc>,
}

impl CachedRobots {
    /// Caches rules fetched now
    ///
    /// # Arguments
    ///
    /// * `rules` - The parsed robots.txt rules
    ///
    /// # Returns
    ///
    /// A cache entry stamped with the current time
    pub fn new(rules: ParsedRobots) -> Self {
        Self {
            rules,
            fetched_at: Utc::now(),
        }
    }

    /// Checks if the cached rules are older than [`ROBOTS_TTL_HOURS`]
    ///
    /// # Returns
    ///
    /// * `true` - If the rules must be fetched again
    /// * `false` - If the cache is still fresh
    pub fn is_stale(&self) -> bool {
        Utc::now() - self.fetched_at > Duration::hours(ROBOTS_TTL_HOURS)
    }

    /// Checks if a URL is allowed according to the cached rules
    ///
    /// # Arguments
    ///
    /// * `url` - The full URL to check
    /// * `user_agent` - The robots.txt product token of the crawler
    ///
    /// # Returns
    ///
    /// * `true` - If the URL is allowed
    /// * `false` - If the URL is disallowed
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        self.rules.is_allowed(url, user_agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_cache() {
        let cache = CachedRobots::new(ParsedRobots::allow_all());
        assert!(!cache.is_stale());
        assert!(cache.is_allowed("https://www.afdb.fr/", "AfdbCrawler"));
    }

    #[test]
    fn test_stale_after_a_day() {
        let mut cache = CachedRobots::new(ParsedRobots::allow_all());
        cache.fetched_at = Utc::now() - Duration::hours(25);
        assert!(cache.is_stale());

        cache.fetched_at = Utc::now() - Duration::hours(23);
        assert!(!cache.is_stale());
    }

    #[test]
    fn test_delegates_to_rules() {
        let cache = CachedRobots::new(ParsedRobots::from_content("User-agent: *\nDisallow: /"));
        assert!(!cache.is_allowed("https://www.afdb.fr/p.html", "AfdbCrawler"));
    }
}
