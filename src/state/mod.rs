//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `RecordState`: Two-phase assembly state of a product record
//! - `DomainState`: Tracks per-domain state for download delays and robots.txt caching

mod domain_state;
mod record_state;

// Re-export main types
pub use domain_state::DomainState;
pub use record_state::RecordState;
