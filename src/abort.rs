//! Single-flight register for the currently tracked analysis.
//!
//! At most one operation is tracked at a time. Registering a new one cancels
//! whatever was still running, and [`AbortCoordinator::abort`] cancels the
//! current one on request (for example from a signal handler thread).

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::cancel::CancellationToken;

static GLOBAL: Lazy<AbortCoordinator> = Lazy::new(AbortCoordinator::new);

/// Process-wide coordinator used by the CLI commands.
pub fn global() -> &'static AbortCoordinator {
    &GLOBAL
}

/// Abort whatever the process-wide coordinator is tracking.
///
/// Returns true if an operation was cancelled.
pub fn request_abort() -> bool {
    global().abort()
}

#[derive(Debug)]
struct Operation {
    id: u64,
    token: CancellationToken,
}

#[derive(Debug, Default)]
struct State {
    current: Option<Operation>,
    running: bool,
    next_id: u64,
}

/// Tracks one cancellable operation at a time.
#[derive(Debug, Default)]
pub struct AbortCoordinator {
    state: Mutex<State>,
}

impl AbortCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `token` as the current operation.
    ///
    /// A previous operation that is still marked running is cancelled before
    /// the new one is stored. The returned guard unregisters the operation
    /// when dropped, unless another operation has replaced it meanwhile.
    pub fn start_operation(&self, token: CancellationToken) -> OperationGuard<'_> {
        let mut state = self.state.lock();

        if state.running {
            if let Some(previous) = &state.current {
                tracing::debug!(id = previous.id, "Cancelling superseded operation");
                previous.token.cancel();
            }
        }

        state.next_id += 1;
        let id = state.next_id;
        state.current = Some(Operation {
            id,
            token: token.clone(),
        });
        state.running = true;

        OperationGuard {
            coordinator: self,
            id,
            token,
        }
    }

    /// Cancel the current operation.
    ///
    /// Returns false when nothing is running, leaving the state untouched.
    pub fn abort(&self) -> bool {
        let mut state = self.state.lock();

        if !state.running {
            return false;
        }

        match &state.current {
            Some(operation) => {
                tracing::info!(id = operation.id, "Operation aborted");
                operation.token.cancel();
                state.running = false;
                true
            }
            None => false,
        }
    }

    /// Reset to idle without cancelling anything.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.current = None;
        state.running = false;
    }

    /// True while an operation is registered and has not been aborted.
    pub fn is_running(&self) -> bool {
        self.state.lock().running
    }

    fn finish(&self, id: u64) {
        let mut state = self.state.lock();
        if state.current.as_ref().map(|op| op.id) == Some(id) {
            state.current = None;
            state.running = false;
        }
    }
}

/// Scope of one registered operation.
#[derive(Debug)]
pub struct OperationGuard<'a> {
    coordinator: &'a AbortCoordinator,
    id: u64,
    token: CancellationToken,
}

impl OperationGuard<'_> {
    /// Token the guarded operation should poll.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Registration id, increasing with every `start_operation`.
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        self.coordinator.finish(self.id);
    }
}
