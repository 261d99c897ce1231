//! Decisions the frontier makes about a dequeued page before dispatch

use std::fmt;

/// What happens to a page taken off the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Admission {
    /// Page passed every check and has been marked visited; capture it
    Dispatch,

    /// Page lies beyond the maximum depth; dropped without being marked visited
    TooDeep,

    /// Page was already dispatched in this run
    AlreadyVisited,

    /// Page was captured successfully by a prior run
    PreExisting,

    /// Page matched a configured skip pattern
    Skipped,
}

impl Admission {
    /// Returns true if the page should be handed to the renderer
    pub fn is_dispatch(&self) -> bool {
        matches!(self, Self::Dispatch)
    }

    /// Returns true if the decision leaves the page marked visited
    pub fn marks_visited(&self) -> bool {
        matches!(self, Self::Dispatch | Self::PreExisting | Self::Skipped)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dispatch => "dispatch",
            Self::TooDeep => "too_deep",
            Self::AlreadyVisited => "already_visited",
            Self::PreExisting => "pre_existing",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for Admission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
