//! Robots.txt rules backed by the robotstxt crate

use robotstxt::DefaultMatcher;
use std::time::Duration;

/// Robots.txt rules for one site
#[derive(Debug, Clone, Default)]
pub struct ParsedRobots {
    /// Raw robots.txt content (empty means allow all)
    content: String,
}

impl ParsedRobots {
    /// Wraps raw robots.txt content
    ///
    /// # Arguments
    ///
    /// * `content` - The raw robots.txt file content
    ///
    /// # Returns
    ///
    /// Rules that can be used to check URL permissions and crawl delays
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// Rules that allow everything
    ///
    /// Used when robots.txt is missing or cannot be fetched.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Returns true if no rule can ever disallow a URL
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Checks a full URL against the rules for `user_agent`
    ///
    /// # Arguments
    ///
    /// * `url` - The full URL to check (e.g., "https://www.afdb.fr/p.html")
    /// * `user_agent` - The robots.txt product token of the crawler
    ///
    /// # Returns
    ///
    /// * `true` - If the URL is allowed, or no rules were loaded
    /// * `false` - If the URL is disallowed
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }

    /// `Crawl-delay` that applies to `user_agent`
    ///
    /// A group naming the agent takes precedence over the `*` group. Agent
    /// names match case-insensitively as substrings of `user_agent`.
    ///
    /// # Arguments
    ///
    /// * `user_agent` - The user agent string or product token
    ///
    /// # Returns
    ///
    /// The delay between requests, if a matching group sets one
    pub fn crawl_delay(&self, user_agent: &str) -> Option<Duration> {
        if self.is_empty() {
            return None;
        }

        let agent = user_agent.to_lowercase();
        let mut group: Vec<String> = Vec::new();
        let mut in_rules = false;
        let mut wildcard_delay = None;
        let mut agent_delay = None;

        for line in self.content.lines() {
            let line = line.split('#').next().unwrap_or_default().trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();

            match key.trim().to_lowercase().as_str() {
                "user-agent" => {
                    // A user-agent line after rules starts a new group
                    if in_rules {
                        group.clear();
                        in_rules = false;
                    }
                    group.push(value.to_lowercase());
                }
                "crawl-delay" => {
                    in_rules = true;
                    let Ok(seconds) = value.parse::<f64>() else {
                        continue;
                    };
                    if !seconds.is_finite() || seconds < 0.0 {
                        continue;
                    }
                    let delay = Duration::from_secs_f64(seconds);
                    if group.iter().any(|ua| ua != "*" && agent.contains(ua.as_str())) {
                        agent_delay = Some(delay);
                    } else if group.iter().any(|ua| ua == "*") {
                        wildcard_delay = Some(delay);
                    }
                }
                _ => in_rules = true,
            }
        }

        agent_delay.or(wildcard_delay)
    }
}
