// src/scheduler.rs
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::SchedulerError;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Starting,
    Running,
    ShuttingDown,
    Stopped,
}

struct Job<C> {
    name: &'static str,
    every: Duration,
    next_due: Instant,
    task: Box<dyn FnMut(&mut C)>,
}

/// Single-threaded interval driver. Jobs share one context `C` and never
/// overlap: a job runs to completion before the next due job is looked at.
pub struct Scheduler<C> {
    jobs: Vec<Job<C>>,
    poll: Duration,
    state: SchedulerState,
}

impl<C> Scheduler<C> {
    /// `poll` bounds how long an idle wait goes without checking the stop flag.
    pub fn new(poll: Duration) -> Self {
        Self { jobs: Vec::new(), poll: poll.max(MIN_INTERVAL), state: SchedulerState::Starting }
    }

    /// Register `task` to run every `every`, first run one interval from now.
    pub fn add_job(&mut self, name: &'static str, every: Duration, task: impl FnMut(&mut C) + 'static) {
        let every = every.max(MIN_INTERVAL);
        self.jobs.push(Job { name, every, next_due: Instant::now() + every, task: Box::new(task) });
        logf!("scheduled '{}' every {}s", name, every.as_secs_f64());
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn job_names(&self) -> Vec<&'static str> {
        self.jobs.iter().map(|j| j.name).collect()
    }

    fn next_job(&self) -> Option<usize> {
        self.jobs
            .iter()
            .enumerate()
            .min_by_key(|(_, j)| j.next_due)
            .map(|(i, _)| i)
    }

    /// Block running due jobs until `stop` is set or a job panics.
    /// A stop request never interrupts a job that is already running.
    pub fn run(&mut self, ctx: &mut C, stop: &AtomicBool) -> Result<(), SchedulerError> {
        self.state = SchedulerState::Running;

        let result = loop {
            if stop.load(Ordering::SeqCst) {
                logf!("stop requested, shutting down scheduler");
                break Ok(());
            }

            let Some(i) = self.next_job() else {
                thread::sleep(self.poll);
                continue;
            };

            let now = Instant::now();
            let job = &mut self.jobs[i];
            if job.next_due > now {
                thread::sleep((job.next_due - now).min(self.poll));
                continue;
            }

            let outcome = catch_unwind(AssertUnwindSafe(|| (job.task)(ctx)));
            job.next_due = rearm(job.next_due, job.every, Instant::now());
            if outcome.is_err() {
                loge!("job '{}' panicked, leaving the scheduling loop", job.name);
                break Err(SchedulerError::JobPanicked(job.name));
            }
        };

        self.state = SchedulerState::ShuttingDown;
        self.jobs.clear();
        self.state = SchedulerState::Stopped;
        result
    }
}

/// Next due time after a run. Missed ticks collapse into one.
fn rearm(prev_due: Instant, every: Duration, now: Instant) -> Instant {
    let next = prev_due + every;
    if next <= now { now + every } else { next }
}
