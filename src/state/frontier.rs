use crate::state::{Admission, CaptureOutcome};
use crate::url::{matches_skip_pattern, normalize_url};
use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};

/// A page waiting in the frontier queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedPage {
    /// URL as first discovered, handed to the renderer
    pub url: String,

    /// Normalized identity used for every membership check
    pub key: String,

    /// Link hops from the seed
    pub depth: u32,
}

/// Aggregate counts over the outcomes recorded in one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
}

/// The single owner of crawl state for one run
///
/// Every URL is keyed by its normalized form on both insertion and lookup.
/// A key is queued at most once per run, so the depth it was first seen at
/// is the depth it is processed at.
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<QueuedPage>,
    seen: HashSet<String>,
    visited: HashSet<String>,
    preexisting: HashSet<String>,
    results: Vec<CaptureOutcome>,
    started_at: Instant,
}

impl Frontier {
    /// Creates an empty frontier
    ///
    /// # Arguments
    ///
    /// * `preexisting` - URLs successfully captured by earlier runs; they are
    ///   normalized here and never dispatched
    pub fn new<I, S>(preexisting: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            queue: VecDeque::new(),
            seen: HashSet::new(),
            visited: HashSet::new(),
            preexisting: preexisting
                .into_iter()
                .map(|url| normalize_url(url.as_ref()))
                .collect(),
            results: Vec::new(),
            started_at: Instant::now(),
        }
    }

    /// Queues a URL at the given depth
    ///
    /// # Returns
    ///
    /// * `true` - The URL was appended to the queue
    /// * `false` - Its normalized form is already visited, pre-existing, or queued earlier
    pub fn enqueue(&mut self, url: &str, depth: u32) -> bool {
        let key = normalize_url(url);
        if self.visited.contains(&key) || self.preexisting.contains(&key) {
            return false;
        }
        if !self.seen.insert(key.clone()) {
            return false;
        }

        self.queue.push_back(QueuedPage {
            url: url.trim().to_string(),
            key,
            depth,
        });
        true
    }

    /// Pops the oldest queued page; `None` means there is no more queued work
    pub fn dequeue(&mut self) -> Option<QueuedPage> {
        self.queue.pop_front()
    }

    /// Marks a URL as dispatched; idempotent
    pub fn mark_visited(&mut self, url: &str) {
        self.visited.insert(normalize_url(url));
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(&normalize_url(url))
    }

    pub fn is_preexisting(&self, url: &str) -> bool {
        self.preexisting.contains(&normalize_url(url))
    }

    /// Decides whether a dequeued page is dispatched
    ///
    /// Checks run in order: depth, already visited, pre-existing, skip
    /// patterns. Every outcome except `TooDeep` and `AlreadyVisited` leaves
    /// the page marked visited, and a `Dispatch` is marked before it is
    /// returned so no second caller can admit the same page.
    pub fn admit(&mut self, page: &QueuedPage, max_depth: u32, skip_patterns: &[String]) -> Admission {
        if page.depth > max_depth {
            return Admission::TooDeep;
        }

        if self.visited.contains(&page.key) {
            return Admission::AlreadyVisited;
        }

        let admission = if self.preexisting.contains(&page.key) {
            Admission::PreExisting
        } else if matches_skip_pattern(&page.url, skip_patterns) {
            Admission::Skipped
        } else {
            Admission::Dispatch
        };

        self.visited.insert(page.key.clone());
        admission
    }

    /// Appends an outcome to this run's results
    pub fn record_result(&mut self, outcome: CaptureOutcome) {
        self.results.push(outcome);
    }

    pub fn results(&self) -> &[CaptureOutcome] {
        &self.results
    }

    /// Consumes the frontier, yielding this run's outcomes in completion order
    pub fn into_results(self) -> Vec<CaptureOutcome> {
        self.results
    }

    /// Counts recorded outcomes by scanning the result list
    pub fn stats(&self) -> CrawlStats {
        let success = self.results.iter().filter(|r| r.success).count();
        CrawlStats {
            total: self.results.len(),
            success,
            failed: self.results.len() - success,
        }
    }

    /// Time since the frontier was created
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Captures per second over the run so far
    pub fn pages_per_second(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.results.len() as f64 / secs
        } else {
            0.0
        }
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn preexisting_count(&self) -> usize {
        self.preexisting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}
