//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlStats`: run-wide counters, error list and page budget behind one lock
//! - `DedupGuard`: content hashes already saved in the run
//! - `VisitedRegistry`: URLs already scheduled in one seed's traversal
//! - `NodeState`: lifecycle of a single traversal node

mod dedup;
mod node_state;
mod stats;
mod visited;

// Re-export main types
pub use dedup::{content_hash, DedupGuard};
pub use node_state::NodeState;
pub use stats::{CrawlSnapshot, CrawlStats, ErrorEntry, SYSTEM_ERROR_KEY};
pub use visited::VisitedRegistry;
