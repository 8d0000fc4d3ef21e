// src/signal.rs
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::MonitorError;

static STOP: AtomicBool = AtomicBool::new(false);

/// The process-wide stop flag the termination handlers set.
pub fn stop_flag() -> &'static AtomicBool {
    &STOP
}

/// First signal asks for a cooperative stop; a second one exits at once.
#[cfg(unix)]
extern "C" fn on_terminate(_: nix::libc::c_int) {
    if STOP.swap(true, Ordering::SeqCst) {
        // SAFETY: `_exit` is async-signal-safe.
        unsafe { nix::libc::_exit(130) };
    }
}

/// Route SIGINT and SIGTERM to the stop flag.
#[cfg(unix)]
pub fn install() -> Result<&'static AtomicBool, MonitorError> {
    use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};

    let action = SigAction::new(SigHandler::Handler(on_terminate), SaFlags::SA_RESTART, SigSet::empty());
    for sig in [Signal::SIGINT, Signal::SIGTERM] {
        // SAFETY: the handler only touches an atomic and may call `_exit`.
        unsafe { sigaction(sig, &action) }.map_err(|e| MonitorError::Signal(format!("{sig:?}: {e}")))?;
    }
    Ok(&STOP)
}

/// No handlers off Unix; Ctrl+C ends the process directly.
#[cfg(not(unix))]
pub fn install() -> Result<&'static AtomicBool, MonitorError> {
    Ok(&STOP)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use nix::sys::signal::{Signal, raise};

    #[test]
    fn sigterm_sets_the_stop_flag() {
        let flag = install().unwrap();
        assert!(std::ptr::eq(flag, stop_flag()));
        raise(Signal::SIGTERM).unwrap();
        assert!(stop_flag().load(Ordering::SeqCst));
    }
}
