// src/error.rs
use std::io;

use thiserror::Error;

/// One probe failing, or the whole chain running dry.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("response is not JSON")]
    NotJson,

    #[error("no follower count in response")]
    NoCount,

    #[error("could not fetch follower count for UID {uid}: all {attempts} probes failed")]
    Exhausted { uid: u64, attempts: usize },

    #[error("stop requested before UID {uid} answered")]
    Interrupted { uid: u64 },
}

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("unexpected column count: {0}")]
    UnknownLayout(usize),

    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("reading series: {0}")]
    Series(#[from] SeriesError),

    #[error("encoding image: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("job '{0}' panicked")]
    JobPanicked(&'static str),
}

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("connectivity self-test failed for every account")]
    SelfTestFailed,

    #[error("stop requested")]
    Interrupted,

    #[error("building HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("installing signal handlers: {0}")]
    Signal(String),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error(transparent)]
    Io(#[from] io::Error),
}
