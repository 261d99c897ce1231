//! URL handling module for Sumi-Frame
//!
//! Pure functions shared by the frontier, the scheduler and discovery:
//! - normalization into the single identity used for dedup
//! - scope checks against the crawl target's origin and extension denylist
//! - link resolution, skip-pattern matching and capture filename derivation

mod filename;
mod matcher;
mod normalize;
mod scope;

pub use filename::{derive_filename, CAPTURE_EXTENSION};
pub use matcher::matches_skip_pattern;
pub use normalize::normalize_url;
pub use scope::{
    ensure_scheme, has_excluded_extension, is_in_scope, parse_base_url, resolve_link,
    EXCLUDED_EXTENSIONS,
};
