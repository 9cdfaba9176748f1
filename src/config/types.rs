use serde::Deserialize;

/// Default site root the crawl starts from
pub const DEFAULT_START_URL: &str = "https://www.afdb.fr";

/// Default stock-status endpoint, without its query string
pub const DEFAULT_STOCK_ENDPOINT: &str =
    "https://www.afdb.fr/INTERSHOP/web/WFS/AFDB-B2B-Site/fr_FR/-/EUR/IncludeProduct-GetStocks";

/// Main configuration structure for the crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub rules: LinkRules,
    #[serde(default)]
    pub stock: StockConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum number of requests in flight at once
    pub max_concurrent_requests: u32,

    /// Minimum time between requests to the same domain (milliseconds)
    pub download_delay_ms: u64,

    /// Whole-request timeout (seconds)
    pub request_timeout_secs: u64,

    /// Connection timeout (seconds)
    pub connect_timeout_secs: u64,

    /// Maximum link depth from a start URL, 0 for unlimited
    pub max_depth: u32,

    /// Maximum number of pages fetched, 0 for unlimited
    pub max_pages: u32,

    /// Whether page requests honour robots.txt
    pub obey_robots: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 16,
            download_delay_ms: 0,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            max_depth: 0,
            max_pages: 0,
            obey_robots: true,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// The site being crawled
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Domain patterns links must stay on (e.g., "afdb.fr" or "*.afdb.fr")
    pub allowed_domains: Vec<String>,

    /// URLs the crawl starts from
    pub start_urls: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            allowed_domains: vec!["*.afdb.fr".to_string()],
            start_urls: vec![DEFAULT_START_URL.to_string()],
        }
    }
}

/// URL rules deciding which links are followed and which pages are products
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LinkRules {
    /// A link ending in one of these suffixes is followed
    pub follow_suffixes: Vec<String>,

    /// Substring marking a product page; such links are always followed
    pub product_marker: String,

    /// A link containing any of these substrings is never followed
    pub deny_markers: Vec<String>,
}

impl Default for LinkRules {
    fn default() -> Self {
        Self {
            follow_suffixes: vec![".html".to_string()],
            product_marker: "SKU".to_string(),
            deny_markers: vec!["INTERSHOP".to_string()],
        }
    }
}

/// Stock-status API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StockConfig {
    /// Endpoint URL without query string
    pub endpoint: String,

    /// Extra attempts after a failed stock request
    pub max_retries: u32,

    /// Delay before each retry (milliseconds)
    pub retry_delay_ms: u64,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_STOCK_ENDPOINT.to_string(),
            max_retries: 0,
            retry_delay_ms: 1000,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// JSON Lines feed, one product per line
    pub jsonl_path: Option<String>,

    /// SQLite database holding products and run history
    pub database_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            jsonl_path: Some("products.jsonl".to_string()),
            database_path: None,
        }
    }
}
