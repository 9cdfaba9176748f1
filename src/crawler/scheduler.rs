//! Scheduler for managing the crawl frontier and rate limiting
//!
//! This module handles:
//! - Priority queue management for pending requests
//! - The duplicate filter for page requests
//! - Global concurrency limiting via a semaphore
//! - Per-domain download delays, including robots.txt crawl delays

use crate::config::CrawlerConfig;
use crate::state::{DomainState, RecordState};
use crate::url::{extract_domain, normalize_url};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use url::Url;

/// Wait suggested when nothing in the frontier reports its own wait time
const DEFAULT_WAIT: Duration = Duration::from_millis(100);

/// What a request is for, and the context that travels with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    /// A page to crawl for links and, if it is a product page, for fields
    Page { depth: u32 },

    /// A stock lookup carrying the record waiting for it
    Stock { record: RecordState, attempt: u32 },
}

/// A request waiting in the frontier
#[derive(Debug, Clone)]
pub struct Request {
    pub url: Url,
    pub domain: String,
    pub kind: RequestKind,
    /// Earliest time the request may be sent (retries)
    pub not_before: Option<Instant>,
}

impl Request {
    pub fn page(url: Url, depth: u32) -> Self {
        Self::new(url, RequestKind::Page { depth })
    }

    pub fn stock(url: Url, record: RecordState) -> Self {
        Self::new(url, RequestKind::Stock { record, attempt: 0 })
    }

    fn new(url: Url, kind: RequestKind) -> Self {
        let domain = extract_domain(&url).unwrap_or_default();
        Self {
            url,
            domain,
            kind,
            not_before: None,
        }
    }

    /// Schedules the same stock request again after `delay`
    pub fn retry(mut self, delay: Duration) -> Self {
        if let RequestKind::Stock { attempt, .. } = &mut self.kind {
            *attempt += 1;
        }
        self.not_before = Some(Instant::now() + delay);
        self
    }

    /// Priority value (lower is served first)
    ///
    /// Stock lookups come before any page so pending records complete
    /// promptly; pages are served shallowest first.
    pub fn priority(&self) -> u32 {
        match self.kind {
            RequestKind::Stock { .. } => 0,
            RequestKind::Page { depth } => depth.saturating_add(1),
        }
    }

    pub fn is_page(&self) -> bool {
        matches!(self.kind, RequestKind::Page { .. })
    }
}

/// Frontier entry; ties on priority are served in insertion order
#[derive(Debug)]
struct QueuedRequest {
    request: Request,
    priority: u32,
    seq: u64,
}

// Lower priority values have higher priority (are popped first from BinaryHeap)
impl Ord for QueuedRequest {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueuedRequest {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedRequest {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for QueuedRequest {}

/// A request cleared for sending, with its concurrency permit
pub struct ScheduledRequest {
    pub request: Request,
    pub permit: OwnedSemaphorePermit,
}

/// Outcome of asking the scheduler for the next request
pub enum Next {
    /// Send this request now
    Ready(ScheduledRequest),
    /// Every queued request is delayed; check again after this long
    Wait(Duration),
    /// The concurrency limit is reached
    Busy,
    /// The frontier is empty
    Empty,
}

/// Scheduler manages the frontier queue and rate limiting
pub struct Scheduler {
    /// Global semaphore for limiting concurrent fetches
    global_semaphore: Arc<Semaphore>,

    /// Per-domain state tracking
    domain_states: HashMap<String, DomainState>,

    /// Pending requests (lower priority values are fetched first)
    frontier: BinaryHeap<QueuedRequest>,

    /// Normalized keys of every page request ever accepted
    seen: HashSet<String>,

    next_seq: u64,

    download_delay: Duration,

    /// Robots.txt agent name used to look up crawl delays
    robots_agent: String,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `robots_agent` - Agent name matched against robots.txt groups
    pub fn new(config: &CrawlerConfig, robots_agent: impl Into<String>) -> Self {
        Self {
            global_semaphore: Arc::new(Semaphore::new(config.max_concurrent_requests as usize)),
            domain_states: HashMap::new(),
            frontier: BinaryHeap::new(),
            seen: HashSet::new(),
            next_seq: 0,
            download_delay: Duration::from_millis(config.download_delay_ms),
            robots_agent: robots_agent.into(),
        }
    }

    /// Adds a request to the frontier
    ///
    /// Page requests whose normalized URL was already accepted are dropped
    /// and `false` is returned. Stock requests are never filtered.
    pub fn enqueue(&mut self, request: Request) -> bool {
        if request.is_page() && !self.seen.insert(dedup_key(&request.url)) {
            tracing::trace!("Duplicate request dropped: {}", request.url);
            return false;
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.frontier.push(QueuedRequest {
            priority: request.priority(),
            request,
            seq,
        });
        true
    }

    /// Gets the next request that can be sent at `now`
    ///
    /// Requests are considered in priority order; the first one that is not
    /// held back by its domain's delay or its own retry time is returned
    /// with a concurrency permit.
    pub fn poll_next(&mut self, now: Instant) -> Next {
        if self.frontier.is_empty() {
            return Next::Empty;
        }

        let Ok(permit) = self.global_semaphore.clone().try_acquire_owned() else {
            return Next::Busy;
        };

        let mut not_ready = Vec::new();
        let mut found = None;
        let mut min_wait: Option<Duration> = None;

        while let Some(queued) = self.frontier.pop() {
            match self.wait_time(&queued.request, now) {
                None => {
                    found = Some(queued);
                    break;
                }
                Some(wait) => {
                    min_wait = Some(min_wait.map_or(wait, |m| m.min(wait)));
                    not_ready.push(queued);
                }
            }
        }

        self.frontier.extend(not_ready);

        match found {
            Some(queued) => {
                tracing::trace!("Dispatching {}", queued.request.url);
                Next::Ready(ScheduledRequest {
                    request: queued.request,
                    permit,
                })
            }
            None => Next::Wait(min_wait.unwrap_or(DEFAULT_WAIT)),
        }
    }

    /// Time `request` must still wait, or None if it can go now
    fn wait_time(&self, request: &Request, now: Instant) -> Option<Duration> {
        let retry_wait = request
            .not_before
            .and_then(|at| at.checked_duration_since(now))
            .filter(|wait| !wait.is_zero());

        let domain_wait = self.domain_states.get(&request.domain).and_then(|state| {
            let delay = state.effective_delay(self.download_delay, &self.robots_agent);
            state.time_until_next_request(delay, now)
        });

        match (retry_wait, domain_wait) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }

    /// Records that a request was made to a domain
    pub fn record_request(&mut self, domain: &str) {
        self.domain_state_mut(domain).record_request(Instant::now());
    }

    /// Gets mutable domain state, creating it on first use
    pub fn domain_state_mut(&mut self, domain: &str) -> &mut DomainState {
        self.domain_states.entry(domain.to_string()).or_default()
    }

    /// Returns the number of requests in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Returns whether the frontier is empty
    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Number of distinct page URLs accepted so far
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

fn dedup_key(url: &Url) -> String {
    normalize_url(url.as_str())
        .map(String::from)
        .unwrap_or_else(|_| url.to_string())
}
