// src/fetch/mod.rs
//! # Follower-count fetching
//!
//! A fetch is an **ordered chain of independent probes**, each with the same
//! contract: `uid -> Result<count, FetchError>`. The chain is evaluated front to
//! back and the first `Ok` wins; every failure is logged and the next probe runs.
//!
//! ## Default chain
//! ```text
//! 3 API endpoints × 3 header profiles   (endpoint-major, random pause before each)
//!   └─ status 200 + JSON  → data.follower, else `"follower": N` in serialized data
//! profile page scrape                   (no pause)
//!   └─ 4 ordered regexes over the raw page text
//! ```
//! If nothing answers, the fetch fails with `FetchError::Exhausted { uid, .. }`.
//!
//! ## Conventions
//! - Probes own a clone of the shared blocking client.
//! - Probes log their own HTTP status and what they matched; the `Fetcher` logs
//!   failures and does the pacing.
//! - Extraction lives in `core::extract`.

mod fetcher;
mod probe;

pub use fetcher::Fetcher;
pub use probe::{API_PATHS, ApiProbe, HeaderProfile, PageProbe, Probe};
