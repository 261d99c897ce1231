//! Scheduler for draining the crawl frontier
//!
//! This module handles:
//! - Eligibility checks on every dequeued page (depth, visited, pre-existing, skip patterns)
//! - Sequential capture when concurrency is 1
//! - Bounded-parallel capture through a semaphore-limited worker pool
//! - Feeding discovered links back into the frontier at depth + 1
//! - The fixed delay between dispatches and cooperative shutdown
//!
//! The frontier is only ever touched by the dispatching task. Workers send a
//! `PageDone` message over a bounded channel and the dispatching task applies
//! it, so the frontier needs no lock.

use crate::config::CrawlerConfig;
use crate::crawler::renderer::PageRenderer;
use crate::state::{Admission, CaptureOutcome, Frontier, QueuedPage};
use crate::url::{is_in_scope, matches_skip_pattern, resolve_link};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinSet};
use url::Url;

/// How often progress is logged, in captures
const PROGRESS_INTERVAL: usize = 10;

/// How a scheduler run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// The queue is empty and nothing is in flight
    Drained,

    /// Shutdown was requested; in-flight captures were awaited
    Cancelled,
}

/// A finished capture reported back to the dispatching task
#[derive(Debug)]
struct PageDone {
    outcome: CaptureOutcome,
    depth: u32,
    /// `None` when links were not requested or extraction failed
    links: Option<Vec<String>>,
}

/// Scheduler drives a frontier to completion through a page renderer
pub struct Scheduler {
    config: CrawlerConfig,
    base_url: Url,
    renderer: Arc<dyn PageRenderer>,
    shutdown: Arc<AtomicBool>,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `config` - Depth limit, concurrency, delay and skip patterns
    /// * `base_url` - The crawl target; links outside its origin are ignored
    /// * `renderer` - Captures pages and lists their links
    /// * `shutdown` - Set to stop dispatching new captures
    pub fn new(
        config: CrawlerConfig,
        base_url: Url,
        renderer: Arc<dyn PageRenderer>,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            config,
            base_url,
            renderer,
            shutdown,
        }
    }

    /// Runs until the frontier drains or shutdown is requested
    pub async fn run(&self, frontier: &mut Frontier) -> CrawlOutcome {
        if self.config.is_sequential() {
            tracing::info!("Crawling sequentially");
            self.run_sequential(frontier).await
        } else {
            tracing::info!("Crawling with up to {} concurrent captures", self.config.concurrency);
            self.run_parallel(frontier).await
        }
    }

    async fn run_sequential(&self, frontier: &mut Frontier) -> CrawlOutcome {
        loop {
            if self.is_shutdown() {
                return CrawlOutcome::Cancelled;
            }

            let Some(page) = self.next_dispatch(frontier) else {
                return CrawlOutcome::Drained;
            };

            let done = capture_page(self.renderer.as_ref(), page, self.config.max_depth).await;
            self.apply(frontier, done);
            self.pause().await;
        }
    }

    async fn run_parallel(&self, frontier: &mut Frontier) -> CrawlOutcome {
        let limit = self.config.concurrency.max(1) as usize;
        let semaphore = Arc::new(Semaphore::new(limit));
        let (tx, mut rx) = mpsc::channel::<PageDone>(limit * 2);
        let mut workers: JoinSet<()> = JoinSet::new();
        let mut outcome = CrawlOutcome::Drained;

        loop {
            while let Ok(done) = rx.try_recv() {
                self.apply(frontier, done);
            }

            if self.is_shutdown() {
                outcome = CrawlOutcome::Cancelled;
                break;
            }

            // Wait for a free slot, applying finished pages meanwhile
            let permit = loop {
                tokio::select! {
                    permit = semaphore.clone().acquire_owned() => break permit.ok(),
                    Some(done) = rx.recv() => self.apply(frontier, done),
                    Some(joined) = workers.join_next(), if !workers.is_empty() => reap(joined),
                }
            };
            let Some(permit) = permit else {
                break;
            };
            if self.is_shutdown() {
                outcome = CrawlOutcome::Cancelled;
                break;
            }

            let Some(page) = self.next_dispatch(frontier) else {
                drop(permit);

                if workers.is_empty() {
                    while let Ok(done) = rx.try_recv() {
                        self.apply(frontier, done);
                    }
                    if frontier.is_empty() {
                        break;
                    }
                    continue;
                }

                // Queue is empty for now; in-flight pages may still add to it
                tokio::select! {
                    Some(done) = rx.recv() => self.apply(frontier, done),
                    Some(joined) = workers.join_next() => reap(joined),
                }
                continue;
            };

            let renderer = Arc::clone(&self.renderer);
            let worker_tx = tx.clone();
            let max_depth = self.config.max_depth;
            workers.spawn(async move {
                let url = page.url.clone();
                let done = capture_page(renderer.as_ref(), page, max_depth).await;
                if worker_tx.send(done).await.is_err() {
                    tracing::warn!("Result for {} dropped: scheduler stopped listening", url);
                }
                drop(permit);
            });

            self.pause().await;
        }

        // Stop submitting, then drain every in-flight result before closing
        drop(tx);
        while let Some(done) = rx.recv().await {
            self.apply(frontier, done);
        }
        while let Some(joined) = workers.join_next().await {
            reap(joined);
        }

        outcome
    }

    /// Dequeues until a page is admitted for capture
    ///
    /// Admission marks the page visited before it is returned, so a page can
    /// never be handed to two workers.
    fn next_dispatch(&self, frontier: &mut Frontier) -> Option<QueuedPage> {
        while let Some(page) = frontier.dequeue() {
            match frontier.admit(&page, self.config.max_depth, &self.config.skip_patterns) {
                Admission::Dispatch => return Some(page),
                Admission::TooDeep => {
                    tracing::debug!("Skipping {} (depth {} exceeds {})", page.url, page.depth, self.config.max_depth);
                }
                Admission::AlreadyVisited => {
                    tracing::debug!("Skipping {} (already visited)", page.url);
                }
                Admission::PreExisting => {
                    tracing::info!("Skipping {} (captured in a previous run)", page.url);
                }
                Admission::Skipped => {
                    tracing::info!("Skipping {} (matches skip pattern)", page.url);
                }
            }
        }
        None
    }

    /// Records a finished page and queues its links
    fn apply(&self, frontier: &mut Frontier, done: PageDone) {
        let PageDone {
            outcome,
            depth,
            links,
        } = done;

        if outcome.success {
            tracing::info!(
                "Captured {} -> {} ({:.2}KB, {}ms)",
                outcome.url,
                outcome.filename,
                outcome.file_size as f64 / 1024.0,
                outcome.duration
            );
        } else {
            tracing::info!("Capture failed for {}: {}", outcome.url, outcome.error_text());
        }
        frontier.record_result(outcome);

        if let Some(links) = links {
            let added = self.enqueue_links(frontier, &links, depth);
            tracing::debug!("Queued {} of {} links at depth {}", added, links.len(), depth + 1);
        }

        let captured = frontier.results().len();
        if captured % PROGRESS_INTERVAL == 0 {
            tracing::info!(
                "Progress: {} pages captured, {} in queue, {:.2} pages/sec",
                captured,
                frontier.queue_len(),
                frontier.pages_per_second()
            );
        }
    }

    /// Queues in-scope links found on a page at `depth`
    ///
    /// # Returns
    ///
    /// The number of links newly added to the queue
    pub fn enqueue_links(&self, frontier: &mut Frontier, links: &[String], depth: u32) -> usize {
        let mut added = 0;
        for link in links {
            let Ok(resolved) = resolve_link(link, &self.base_url) else {
                continue;
            };
            if !is_in_scope(&resolved, &self.base_url) {
                continue;
            }
            if matches_skip_pattern(&resolved, &self.config.skip_patterns) {
                if !frontier.is_visited(&resolved) {
                    tracing::info!("Skipping {} (matches skip pattern)", resolved);
                    frontier.mark_visited(&resolved);
                }
                continue;
            }
            if frontier.enqueue(&resolved, depth + 1) {
                added += 1;
            }
        }
        added
    }

    async fn pause(&self) {
        if self.config.request_delay > 0 && !self.is_shutdown() {
            tokio::time::sleep(Duration::from_millis(self.config.request_delay)).await;
        }
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

/// Captures one page and, if it succeeded below the depth limit, lists its links
async fn capture_page(renderer: &dyn PageRenderer, page: QueuedPage, max_depth: u32) -> PageDone {
    let response = renderer.capture(&page.url).await;
    let success = response.success;
    let outcome = response.into_outcome(&page.url);

    let links = if success && page.depth < max_depth {
        match renderer.extract_links(&page.url).await {
            Ok(links) => Some(links),
            Err(e) => {
                tracing::warn!("Link extraction failed for {}: {}", page.url, e);
                None
            }
        }
    } else {
        None
    };

    PageDone {
        outcome,
        depth: page.depth,
        links,
    }
}

fn reap(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        tracing::error!("Capture worker failed: {}", e);
    }
}
