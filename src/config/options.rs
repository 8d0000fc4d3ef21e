// src/config/options.rs
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use rand::Rng;

use super::consts::*;

/// Inclusive random delay window. Sampled before every paced request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DelayRange {
    pub min: Duration,
    pub max: Duration,
}

impl DelayRange {
    pub const ZERO: DelayRange = DelayRange { min: Duration::ZERO, max: Duration::ZERO };

    pub fn secs(min: f64, max: f64) -> Self {
        Self {
            min: Duration::from_secs_f64(min.max(0.0)),
            max: Duration::from_secs_f64(max.max(0.0)),
        }
    }

    pub fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let secs = rand::thread_rng().gen_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }

    /// Sleep for one sampled delay (no-op for a zero window).
    pub fn pause(&self) {
        let d = self.sample();
        if !d.is_zero() {
            std::thread::sleep(d);
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FetchOptions {
    /// Scheme + host of the structured API, no trailing slash
    pub api_base: String,
    /// Scheme + host of the public profile pages
    pub space_base: String,
    pub timeout: Duration,
    pub probe_delay: DelayRange,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            api_base: s!(API_BASE),
            space_base: s!(SPACE_BASE),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            probe_delay: DelayRange::secs(PROBE_DELAY_SECS.0, PROBE_DELAY_SECS.1),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub default_uids: Vec<u64>,
    pub collect_every: Duration,
    pub render_every: Duration,
    pub render_min_gap: Duration,
    /// How often an idle scheduler wakes to look for due jobs / a stop request
    pub poll: Duration,
    pub account_delay: DelayRange,
    pub local_offset_secs: i32,
    pub fetch: FetchOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DATA_DIR),
            default_uids: DEFAULT_UIDS.to_vec(),
            collect_every: Duration::from_secs(COLLECT_EVERY_SECS),
            render_every: Duration::from_secs(RENDER_EVERY_SECS),
            render_min_gap: Duration::from_secs(RENDER_MIN_GAP_SECS),
            poll: Duration::from_millis(SCHEDULER_POLL_MS),
            account_delay: DelayRange::secs(ACCOUNT_DELAY_SECS.0, ACCOUNT_DELAY_SECS.1),
            local_offset_secs: LOCAL_OFFSET_SECS,
            fetch: FetchOptions::default(),
        }
    }
}

impl Settings {
    /// Defaults rooted at another data directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self { data_dir: dir.as_ref().to_path_buf(), ..Self::default() }
    }

    /// Same settings with every randomized pause removed.
    pub fn without_delays(mut self) -> Self {
        self.account_delay = DelayRange::ZERO;
        self.fetch.probe_delay = DelayRange::ZERO;
        self
    }

    /// Offset of the second timestamp column; falls back to UTC if out of range.
    pub fn local_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.local_offset_secs).unwrap_or_else(|| Utc.fix())
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }
}
