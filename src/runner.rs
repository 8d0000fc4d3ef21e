// src/runner.rs
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;

use crate::{
    chart::{RenderOutcome, Renderer},
    config::{ConfigStore, Settings, TrackedAccount},
    error::{FetchError, MonitorError},
    fetch::Fetcher,
    scheduler::Scheduler,
    series::SeriesStore,
    signal,
};

pub const COLLECT_JOB: &str = "collect_all_users";
pub const RENDER_JOB: &str = "render_all_charts";

static NEVER_STOP: AtomicBool = AtomicBool::new(false);

/// Which accounts a pass handled, by outcome.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub succeeded: Vec<u64>,
    pub skipped: Vec<u64>,
    pub failed: Vec<u64>,
}

/// Everything a collection or render pass needs, threaded explicitly.
pub struct Monitor {
    settings: Settings,
    config: ConfigStore,
    series: SeriesStore,
    fetcher: Fetcher,
    renderer: Renderer,
    stop: &'static AtomicBool,
}

impl Monitor {
    pub fn new(settings: Settings) -> Result<Self, MonitorError> {
        let fetcher = Fetcher::new(&settings.fetch)?;
        Ok(Self::with_fetcher(settings, fetcher))
    }

    pub fn with_fetcher(settings: Settings, fetcher: Fetcher) -> Self {
        let offset = settings.local_offset();
        let interval = settings.collect_every.as_secs();
        Self {
            config: ConfigStore::new(settings.config_path(), &settings.default_uids, interval),
            series: SeriesStore::new(&settings.data_dir, offset),
            renderer: Renderer::new(&settings.data_dir, offset, settings.render_min_gap),
            fetcher,
            settings,
            stop: &NEVER_STOP,
        }
    }

    /// Passes and the self-test end early once `stop` is set.
    pub fn with_stop(mut self, stop: &'static AtomicBool) -> Self {
        self.stop = stop;
        self.fetcher.set_stop(stop);
        self
    }

    fn stopping(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    pub fn series(&self) -> &SeriesStore {
        &self.series
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Connectivity check: fetch accounts in order until one answers.
    /// Falls back to the default UIDs when nothing is enabled.
    pub fn self_test(&self, accounts: &[TrackedAccount]) -> Result<u64, MonitorError> {
        logf!("testing API connectivity...");
        let mut candidates: Vec<u64> = accounts.iter().filter(|a| a.enabled).map(|a| a.uid).collect();
        if candidates.is_empty() {
            candidates = self.settings.default_uids.clone();
        }

        for uid in candidates {
            if self.stopping() {
                return Err(MonitorError::Interrupted);
            }
            logf!("testing UID {}", uid);
            match self.fetcher.fetch(uid) {
                Ok(fans) => {
                    logf!("UID {} answered, follower count {}", uid, fans);
                    return Ok(uid);
                }
                Err(FetchError::Interrupted { .. }) => return Err(MonitorError::Interrupted),
                Err(e) => loge!("UID {} failed the connectivity test: {}", uid, e),
            }
        }
        loge!("every test UID failed, check the network or the API status");
        Err(MonitorError::SelfTestFailed)
    }

    /// Create a header-only series file for each enabled account lacking one.
    pub fn ensure_logs(&self, accounts: &[TrackedAccount]) {
        for a in accounts.iter().filter(|a| a.enabled) {
            match self.series.ensure(a.uid) {
                Ok(true) => {
                    let path = self.series.path(a.uid);
                    logf!(uid = a.uid; "created {}", path.display());
                }
                Ok(false) => {}
                Err(e) => loge!(uid = a.uid; "could not create series file: {}", e),
            }
        }
    }

    /// One collection pass over the persisted account list; saves it afterwards.
    pub fn collect_all(&mut self) -> PassSummary {
        let mut accounts = self.config.load();
        if accounts.is_empty() {
            logw!("no tracked accounts, nothing to do");
            return PassSummary::default();
        }
        let summary = self.collect_pass(&mut accounts);
        self.config.save(&accounts);
        summary
    }

    /// Fetch + append for every enabled account in `accounts`, in order.
    /// Per-account failures are logged and do not stop the pass; a stop request does.
    pub fn collect_pass(&mut self, accounts: &mut [TrackedAccount]) -> PassSummary {
        let mut summary = PassSummary::default();
        let offset = self.settings.local_offset();
        let enabled: Vec<usize> = (0..accounts.len()).filter(|&i| accounts[i].enabled).collect();

        for (n, &i) in enabled.iter().enumerate() {
            if self.stopping() {
                logw!("stop requested, ending collection pass early");
                break;
            }
            let account = &mut accounts[i];
            let uid = account.uid;

            match self.fetcher.fetch(uid) {
                Ok(fans) => {
                    let now = Utc::now();
                    match self.series.append(uid, now, fans) {
                        Ok(()) => {
                            account.last_check = Some(now.with_timezone(&offset).to_rfc3339());
                            logf!(uid = uid; "follower count {}", fans);
                            summary.succeeded.push(uid);
                        }
                        Err(e) => {
                            loge!(uid = uid; "could not record observation: {}", e);
                            summary.failed.push(uid);
                        }
                    }
                }
                Err(FetchError::Interrupted { .. }) => {
                    logw!(uid = uid; "stop requested, ending collection pass early");
                    break;
                }
                Err(e) => {
                    loge!(uid = uid; "collection failed: {}", e);
                    summary.failed.push(uid);
                }
            }

            if n + 1 < enabled.len() && !self.stopping() {
                self.settings.account_delay.pause();
            }
        }
        summary
    }

    /// Redraw every enabled account's chart (subject to the render gap).
    pub fn render_all(&mut self) -> PassSummary {
        let mut summary = PassSummary::default();
        for a in self.config.load().into_iter().filter(|a| a.enabled) {
            if self.stopping() {
                break;
            }
            match self.renderer.render(&self.series, a.uid) {
                Ok(RenderOutcome::Rendered(_)) => summary.succeeded.push(a.uid),
                Ok(_) => summary.skipped.push(a.uid),
                Err(e) => {
                    loge!(uid = a.uid; "chart failed: {}", e);
                    summary.failed.push(a.uid);
                }
            }
        }
        summary
    }
}

/// Full lifecycle with SIGINT/SIGTERM wired to a cooperative stop.
pub fn run(settings: Settings) -> Result<(), MonitorError> {
    let stop = signal::install()?;
    run_until(settings, stop)
}

/// Startup, first passes, then the periodic loop until `stop` is set.
/// A stop during startup returns `Ok` before the next phase begins.
pub fn run_until(settings: Settings, stop: &'static AtomicBool) -> Result<(), MonitorError> {
    match start(settings, stop) {
        Ok(Some(mut monitor)) => {
            let mut scheduler = schedule(&monitor);
            scheduler.run(&mut monitor, stop)?;
            logf!("stopped cleanly");
            Ok(())
        }
        Ok(None) | Err(MonitorError::Interrupted) => {
            logf!("stop requested during startup, exiting");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Self-test, log files and the first passes. `None` once a stop is seen.
fn start(settings: Settings, stop: &'static AtomicBool) -> Result<Option<Monitor>, MonitorError> {
    let stopped = || stop.load(Ordering::SeqCst);
    if stopped() {
        return Ok(None);
    }
    let mut monitor = Monitor::new(settings)?.with_stop(stop);

    let accounts = monitor.config.load();
    logf!("loaded {} account(s)", accounts.len());

    if let Err(e) = monitor.self_test(&accounts) {
        if !matches!(e, MonitorError::Interrupted) {
            loge!("API test failed, exiting");
        }
        return Err(e);
    }
    if stopped() {
        return Ok(None);
    }

    monitor.ensure_logs(&accounts);

    logf!("first collection pass...");
    monitor.collect_all();
    if stopped() {
        return Ok(None);
    }
    monitor.render_all();
    if stopped() {
        return Ok(None);
    }
    Ok(Some(monitor))
}

fn schedule(monitor: &Monitor) -> Scheduler<Monitor> {
    let settings = &monitor.settings;
    let mut scheduler = Scheduler::new(settings.poll);
    scheduler.add_job(COLLECT_JOB, settings.collect_every, |m: &mut Monitor| {
        m.collect_all();
    });
    scheduler.add_job(RENDER_JOB, settings.render_every, |m: &mut Monitor| {
        m.render_all();
    });

    let uids: Vec<u64> = monitor.config.load().iter().map(|a| a.uid).collect();
    logf!("follower monitor started");
    logf!("data directory: {}", settings.data_dir.display());
    logf!("monitoring UIDs: {:?}", uids);
    logf!("press Ctrl+C to stop");
    scheduler
}
