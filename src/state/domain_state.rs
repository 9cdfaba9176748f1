use crate::robots::{CachedRobots, ParsedRobots};
use std::time::{Duration, Instant};

/// Tracks the state of a domain during crawling
///
/// Holds what is needed to space out requests to one host and the cached
/// robots.txt rules for it.
#[derive(Debug, Clone, Default)]
pub struct DomainState {
    /// Number of requests made to this domain in the current crawl
    pub request_count: u32,

    /// Timestamp of the last request to this domain
    pub last_request_time: Option<Instant>,

    /// Cached robots.txt rules for this domain
    pub robots: Option<CachedRobots>,
}

impl DomainState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that a request was made to this domain
    pub fn record_request(&mut self, now: Instant) {
        self.request_count += 1;
        self.last_request_time = Some(now);
    }

    /// Time left before the next request is allowed, if any
    pub fn time_until_next_request(&self, delay: Duration, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        let elapsed = now.saturating_duration_since(last);
        (elapsed < delay).then(|| delay - elapsed)
    }

    /// Returns true if robots.txt has never been fetched or the cache expired
    pub fn needs_robots(&self) -> bool {
        self.robots.as_ref().map_or(true, CachedRobots::is_stale)
    }

    /// Replaces the cached robots.txt rules
    pub fn update_robots(&mut self, rules: ParsedRobots) {
        self.robots = Some(CachedRobots::new(rules));
    }

    /// Checks a URL against the cached rules; allowed when nothing is cached
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        self.robots
            .as_ref()
            .map_or(true, |robots| robots.is_allowed(url, user_agent))
    }

    /// Delay between requests: the configured delay or the robots.txt
    /// `Crawl-delay`, whichever is longer
    pub fn effective_delay(&self, configured: Duration, user_agent: &str) -> Duration {
        self.robots
            .as_ref()
            .and_then(|robots| robots.rules.crawl_delay(user_agent))
            .map_or(configured, |crawl_delay| crawl_delay.max(configured))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const DELAY: Duration = Duration::from_millis(1000);

    #[test]
    fn test_new_domain_state() {
        let state = DomainState::new();
        assert_eq!(state.request_count, 0);
        assert!(state.last_request_time.is_none());
        assert!(state.robots.is_none());
    }

    #[test]
    fn test_zero_delay_never_waits() {
        let mut state = DomainState::new();
        let now = Instant::now();
        state.record_request(now);
        assert!(state.time_until_next_request(Duration::ZERO, now).is_none());
    }

    #[test]
    fn test_record_request() {
        let mut state = DomainState::new();
        let now = Instant::now();

        state.record_request(now);
        assert_eq!(state.request_count, 1);
        assert_eq!(state.last_request_time, Some(now));

        state.record_request(now);
        assert_eq!(state.request_count, 2);
    }

    #[test]
    fn test_time_until_next_request() {
        let mut state = DomainState::new();
        let now = Instant::now();

        assert!(state.time_until_next_request(DELAY, now).is_none());

        state.last_request_time = Some(now);
        assert_eq!(state.time_until_next_request(DELAY, now), Some(DELAY));

        let soon = now + Duration::from_millis(500);
        assert_eq!(
            state.time_until_next_request(DELAY, soon),
            Some(Duration::from_millis(500))
        );

        let later = now + Duration::from_millis(1100);
        assert!(state.time_until_next_request(DELAY, later).is_none());
    }

    #[test]
    fn test_needs_robots() {
        let mut state = DomainState::new();
        assert!(state.needs_robots());

        state.update_robots(ParsedRobots::allow_all());
        assert!(!state.needs_robots());

        if let Some(robots) = state.robots.as_mut() {
            robots.fetched_at = Utc::now() - chrono::Duration::hours(25);
        }
        assert!(state.needs_robots());
    }

    #[test]
    fn test_is_allowed_uses_cached_rules() {
        let mut state = DomainState::new();
        assert!(state.is_allowed("https://www.afdb.fr/checkout", "AfdbCrawler"));

        state.update_robots(ParsedRobots::from_content("User-agent: *\nDisallow: /checkout"));
        assert!(!state.is_allowed("https://www.afdb.fr/checkout", "AfdbCrawler"));
        assert!(state.is_allowed("https://www.afdb.fr/outillage.html", "AfdbCrawler"));
    }

    #[test]
    fn test_effective_delay() {
        let mut state = DomainState::new();
        let configured = Duration::from_millis(250);
        assert_eq!(state.effective_delay(configured, "AfdbCrawler"), configured);

        state.update_robots(ParsedRobots::from_content("User-agent: *\nCrawl-delay: 1"));
        assert_eq!(
            state.effective_delay(configured, "AfdbCrawler"),
            Duration::from_secs(1)
        );
        assert_eq!(
            state.effective_delay(Duration::from_secs(5), "AfdbCrawler"),
            Duration::from_secs(5)
        );
    }
}
