//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `Frontier`: the work queue, visited/pre-existing sets and this run's results
//! - `Admission`: the eligibility decision for a dequeued page
//! - `CaptureOutcome`: the recorded result of one capture attempt

mod admission;
mod frontier;
mod outcome;

// Re-export main types
pub use admission::Admission;
pub use frontier::{CrawlStats, Frontier, QueuedPage};
pub use outcome::CaptureOutcome;
