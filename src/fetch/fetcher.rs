// src/fetch/fetcher.rs
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::{DelayRange, FetchOptions};
use crate::core::net::build_client;
use crate::error::FetchError;

use super::probe::{API_PATHS, ApiProbe, HeaderProfile, PageProbe, Probe};

static NEVER_STOP: AtomicBool = AtomicBool::new(false);

pub struct Fetcher {
    probes: Vec<Box<dyn Probe>>,
    delay: DelayRange,
    stop: &'static AtomicBool,
}

impl Fetcher {
    /// Default chain: every endpoint × header profile, then the profile page.
    pub fn new(opts: &FetchOptions) -> Result<Self, reqwest::Error> {
        let api_client = build_client(opts.timeout, ApiProbe::CERTS)?;
        let page_client = build_client(opts.timeout, PageProbe::CERTS)?;

        let mut probes: Vec<Box<dyn Probe>> = Vec::with_capacity(API_PATHS.len() * 3 + 1);
        for endpoint in 0..API_PATHS.len() {
            for profile in 0..HeaderProfile::ALL.len() {
                probes.push(Box::new(ApiProbe::new(
                    api_client.clone(),
                    &opts.api_base,
                    &opts.space_base,
                    endpoint,
                    profile,
                )));
            }
        }
        probes.push(Box::new(PageProbe::new(page_client, &opts.space_base)));

        Ok(Self::with_probes(probes, opts.probe_delay))
    }

    pub fn with_probes(probes: Vec<Box<dyn Probe>>, delay: DelayRange) -> Self {
        Self { probes, delay, stop: &NEVER_STOP }
    }

    /// Checked before every probe; once set, `fetch` gives up with `Interrupted`.
    pub fn set_stop(&mut self, stop: &'static AtomicBool) {
        self.stop = stop;
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Run the chain for `uid`; first success wins.
    pub fn fetch(&self, uid: u64) -> Result<u64, FetchError> {
        for probe in &self.probes {
            if self.stop.load(Ordering::SeqCst) {
                return Err(FetchError::Interrupted { uid });
            }
            if probe.paced() {
                self.delay.pause();
            }
            match probe.probe(uid) {
                Ok(n) => return Ok(n),
                Err(e) => logw!(uid = uid; "{} failed: {}", probe.label(), e),
            }
        }
        Err(FetchError::Exhausted { uid, attempts: self.probes.len() })
    }
}
