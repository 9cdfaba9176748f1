//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding the frontier with the start URLs
//! - Dispatching page and stock fetches concurrently
//! - Classifying discovered links and following the accepted ones
//! - Extracting product pages and chaining their stock lookups
//! - Handing completed records to the sinks

use crate::config::Config;
use crate::crawler::fetcher::is_html;
use crate::crawler::parser::extract_links;
use crate::crawler::scheduler::{Next, Request, RequestKind, ScheduledRequest, Scheduler};
use crate::crawler::{build_http_client, fetch_url, FetchResult};
use crate::extract::extract_fields;
use crate::item::{assemble, PartialRecord, ProductRecord};
use crate::output::{CrawlStats, ItemSink};
use crate::robots::fetch_robots;
use crate::state::RecordState;
use crate::stock::build_stock_url;
use crate::storage::RunStatus;
use crate::url::{classify_link, is_product_page};
use crate::CrawlError;
use reqwest::Client;
use scraper::Html;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use url::Url;

/// Upper bound on how long the loop sleeps before re-checking the frontier
const MAX_IDLE_WAIT: Duration = Duration::from_secs(1);

/// A finished fetch, returned from its task
struct Completed {
    request: Request,
    result: FetchResult,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    client: Client,
    scheduler: Scheduler,
    sinks: Vec<Box<dyn ItemSink>>,
    stats: CrawlStats,
    pages_dispatched: u32,
    in_flight: JoinSet<Completed>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `sinks` - Destinations for completed product records
    pub fn new(config: Config, sinks: Vec<Box<dyn ItemSink>>) -> Result<Self, CrawlError> {
        let client = build_http_client(&config.user_agent, &config.crawler)?;
        let mut scheduler = Scheduler::new(&config.crawler, config.user_agent.crawler_name.clone());

        for start in &config.site.start_urls {
            let url = Url::parse(start)?;
            if !scheduler.enqueue(Request::page(url, 0)) {
                tracing::debug!("Duplicate start URL ignored: {}", start);
            }
        }

        Ok(Self {
            config,
            client,
            scheduler,
            sinks,
            stats: CrawlStats::default(),
            pages_dispatched: 0,
            in_flight: JoinSet::new(),
        })
    }

    /// Runs the crawl until no request is pending or in flight
    ///
    /// Failures of single pages or records are logged and counted; only a
    /// sink failure aborts the crawl.
    pub async fn run(mut self) -> Result<CrawlStats, CrawlError> {
        tracing::info!(
            "Starting crawl from {} start URL(s)",
            self.config.site.start_urls.len()
        );
        let start_time = Instant::now();

        let result = self.crawl_loop().await;

        let status = match &result {
            Ok(()) => RunStatus::Completed,
            Err(_) => RunStatus::Failed,
        };
        for sink in &mut self.sinks {
            if let Err(e) = sink.finish(status) {
                tracing::error!("Failed to finish {} output: {}", sink.name(), e);
                if result.is_ok() {
                    return Err(e.into());
                }
            }
        }
        result?;

        tracing::info!(
            "Crawl completed in {:?}, {} distinct URLs seen",
            start_time.elapsed(),
            self.scheduler.seen_count()
        );
        self.stats.log_summary();
        Ok(self.stats)
    }

    async fn crawl_loop(&mut self) -> Result<(), CrawlError> {
        loop {
            let wait = self.dispatch_ready().await;

            if self.in_flight.is_empty() {
                match wait {
                    Some(wait) => {
                        tokio::time::sleep(wait).await;
                        continue;
                    }
                    None if self.scheduler.is_empty() => {
                        tracing::info!("Frontier is empty, crawl complete");
                        return Ok(());
                    }
                    None => continue,
                }
            }

            let sleep = tokio::time::sleep(wait.unwrap_or(MAX_IDLE_WAIT));
            tokio::select! {
                Some(joined) = self.in_flight.join_next() => match joined {
                    Ok(completed) => self.handle_completed(completed)?,
                    Err(e) => tracing::error!("Fetch task failed: {}", e),
                },
                _ = sleep => {}
            }
        }
    }

    /// Dispatches every request that may go now
    ///
    /// Returns how long to wait before the next delayed request becomes
    /// ready, if the frontier is held back by delays.
    async fn dispatch_ready(&mut self) -> Option<Duration> {
        loop {
            match self.scheduler.poll_next(Instant::now()) {
                Next::Ready(scheduled) => self.dispatch(scheduled).await,
                Next::Wait(wait) => return Some(wait.min(MAX_IDLE_WAIT)),
                Next::Busy | Next::Empty => return None,
            }
        }
    }

    async fn dispatch(&mut self, scheduled: ScheduledRequest) {
        let ScheduledRequest { request, permit } = scheduled;

        if request.is_page() {
            let max_pages = self.config.crawler.max_pages;
            if max_pages > 0 && self.pages_dispatched >= max_pages {
                tracing::debug!("Page limit reached, dropping {}", request.url);
                self.stats.limit_dropped += 1;
                return;
            }

            if self.config.crawler.obey_robots && !self.robots_allow(&request).await {
                tracing::info!("URL {} disallowed by robots.txt", request.url);
                self.stats.robots_denied += 1;
                return;
            }

            self.pages_dispatched += 1;
        } else {
            self.stats.stock_requests += 1;
        }

        self.scheduler.record_request(&request.domain);
        tracing::debug!("Fetching {}", request.url);

        let client = self.client.clone();
        self.in_flight.spawn(async move {
            let result = fetch_url(&client, request.url.as_str()).await;
            drop(permit);
            Completed { request, result }
        });
    }

    /// Checks a page request against robots.txt, fetching it when the cache
    /// for the domain is empty or stale
    async fn robots_allow(&mut self, request: &Request) -> bool {
        if self.scheduler.domain_state_mut(&request.domain).needs_robots() {
            let rules = fetch_robots(&self.client, &request.url).await;
            self.scheduler
                .domain_state_mut(&request.domain)
                .update_robots(rules);
        }

        self.scheduler
            .domain_state_mut(&request.domain)
            .is_allowed(request.url.as_str(), &self.config.user_agent.crawler_name)
    }

    fn handle_completed(&mut self, completed: Completed) -> Result<(), CrawlError> {
        let Completed { request, result } = completed;

        match request.kind {
            RequestKind::Page { depth } => {
                self.handle_page(request.url, depth, result);
                Ok(())
            }
            RequestKind::Stock { .. } => self.handle_stock(request, result),
        }
    }

    fn handle_page(&mut self, url: Url, depth: u32, result: FetchResult) {
        let (final_url, content_type, body) = match result {
            FetchResult::Success {
                final_url,
                content_type,
                body,
                ..
            } => (final_url, content_type, body),
            FetchResult::HttpError { status_code } => {
                tracing::warn!("HTTP {} for {}", status_code, url);
                self.stats.fetch_errors += 1;
                return;
            }
            FetchResult::NetworkError { error, .. } => {
                tracing::warn!("Failed to fetch {}: {}", url, error);
                self.stats.fetch_errors += 1;
                return;
            }
        };

        self.stats.pages_fetched += 1;

        if !is_html(&content_type) {
            tracing::debug!("Skipping {} with Content-Type {}", final_url, content_type);
            self.stats.pages_skipped += 1;
            return;
        }

        let page_url = Url::parse(&final_url).unwrap_or(url);
        let document = Html::parse_document(&body);

        self.follow_links(&document, &page_url, depth);

        if is_product_page(page_url.as_str(), &self.config.rules) {
            match extract_fields(page_url.as_str(), &document) {
                Ok(partial) => self.request_stock(partial),
                Err(e) => {
                    let error = CrawlError::Extract {
                        url: page_url.to_string(),
                        source: e,
                    };
                    tracing::warn!("Dropping product page: {}", error);
                    self.stats.sku_failures += 1;
                }
            }
        }
    }

    fn follow_links(&mut self, document: &Html, page_url: &Url, depth: u32) {
        let max_depth = self.config.crawler.max_depth;
        let links = extract_links(document, page_url);

        if max_depth > 0 && depth >= max_depth {
            tracing::trace!("Depth limit reached at {}, {} links dropped", page_url, links.len());
            self.stats.limit_dropped += links.len() as u64;
            return;
        }

        for link in links {
            let decision = classify_link(
                &link,
                &self.config.rules,
                &self.config.site.allowed_domains,
            );
            if !decision.follow {
                tracing::trace!("Link filtered: {}", link);
                self.stats.links_filtered += 1;
                continue;
            }

            if decision.product {
                tracing::trace!("Product page found: {}", link);
            }
            if self.scheduler.enqueue(Request::page(link, depth + 1)) {
                self.stats.links_queued += 1;
            } else {
                self.stats.links_duplicate += 1;
            }
        }
    }

    /// Chains the stock lookup for a freshly extracted record
    fn request_stock(&mut self, partial: PartialRecord) {
        let Some(sku) = partial.sku.clone() else {
            self.stats.sku_failures += 1;
            return;
        };

        match build_stock_url(&self.config.stock.endpoint, &sku) {
            Ok(stock_url) => {
                tracing::debug!("Product {} (SKU {}) waiting for stock", partial.url, sku);
                self.scheduler
                    .enqueue(Request::stock(stock_url, RecordState::Pending(partial)));
            }
            Err(e) => {
                tracing::warn!("Cannot build stock request for SKU {}: {}", sku, e);
                self.stats.stock_failures += 1;
            }
        }
    }

    fn handle_stock(&mut self, request: Request, result: FetchResult) -> Result<(), CrawlError> {
        let RequestKind::Stock { record, attempt } = &request.kind else {
            return Ok(());
        };
        let attempt = *attempt;
        let sku = record.sku().unwrap_or_default().to_string();
        let page = record.url().to_string();

        let failure = match result {
            FetchResult::Success { body, .. } => {
                let RequestKind::Stock { record, .. } = request.kind else {
                    return Ok(());
                };
                match assemble(record, &body) {
                    Ok(state) => {
                        if let Some(product) = state.into_record() {
                            self.emit(product)?;
                        }
                    }
                    Err(e) => {
                        // Malformed answers are not retried
                        let error = CrawlError::Stock { sku, source: e };
                        tracing::warn!("Dropping record for {}: {}", page, error);
                        self.stats.stock_failures += 1;
                    }
                }
                return Ok(());
            }
            FetchResult::HttpError { status_code } => format!("HTTP {}", status_code),
            FetchResult::NetworkError { error, .. } => error,
        };

        if attempt < self.config.stock.max_retries {
            tracing::info!(
                "Stock request for SKU {} failed ({}), retry {}/{}",
                sku,
                failure,
                attempt + 1,
                self.config.stock.max_retries
            );
            self.stats.stock_retries += 1;
            let delay = Duration::from_millis(self.config.stock.retry_delay_ms);
            self.scheduler.enqueue(request.retry(delay));
        } else {
            tracing::warn!(
                "Dropping record for {} (SKU {}): stock request failed ({})",
                page,
                sku,
                failure
            );
            self.stats.stock_failures += 1;
        }

        Ok(())
    }

    /// Hands a completed record to every sink
    fn emit(&mut self, product: ProductRecord) -> Result<(), CrawlError> {
        tracing::info!("Scraped {} (SKU {}): {}", product.url, product.sku, product.stock);
        for sink in &mut self.sinks {
            sink.write_item(&product)?;
        }
        self.stats.products_emitted += 1;
        Ok(())
    }

    /// Counters collected so far
    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }
}
