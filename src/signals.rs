//! Routes SIGINT/SIGTERM to the process-wide abort coordinator.
//!
//! The signal handler only sets a flag. A watcher thread polls the flag and
//! calls [`crate::abort::request_abort`] outside signal context.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[cfg(unix)]
use nix::sys::signal::{self, SigHandler, Signal};

use crate::abort;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Install handlers for SIGINT and SIGTERM.
///
/// Once installed, an interrupt no longer terminates the process; it is
/// turned into an abort request by a running [`AbortWatcher`].
#[cfg(unix)]
pub fn install_abort_handlers() -> io::Result<()> {
    unsafe {
        signal::signal(Signal::SIGTERM, SigHandler::Handler(handle_interrupt))?;
        signal::signal(Signal::SIGINT, SigHandler::Handler(handle_interrupt))?;
    }
    Ok(())
}

#[cfg(not(unix))]
pub fn install_abort_handlers() -> io::Result<()> {
    Ok(())
}

#[cfg(unix)]
extern "C" fn handle_interrupt(_: i32) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Check and clear the interrupt flag
pub fn take_interrupt() -> bool {
    INTERRUPTED.swap(false, Ordering::SeqCst)
}

/// Background thread forwarding interrupts to the abort coordinator.
///
/// Stops when dropped.
pub struct AbortWatcher {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl AbortWatcher {
    pub fn spawn() -> io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("reclaim-signals".into())
            .spawn(move || {
                while !flag.load(Ordering::SeqCst) {
                    if take_interrupt() {
                        if abort::request_abort() {
                            tracing::info!("Interrupt received, aborting analysis");
                        } else {
                            tracing::debug!("Interrupt received with nothing to abort");
                        }
                    }
                    thread::sleep(POLL_INTERVAL);
                }
            })?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }
}

impl Drop for AbortWatcher {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
