//! Cooperative cancellation shared by every tier of an analysis.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::AnalyzeError;

#[derive(Debug)]
struct Inner {
    cancelled: AtomicBool,
    deadline: Option<Instant>,
}

/// Cloneable handle to a cancellation flag with an optional deadline.
///
/// All clones observe the same state. Cancelling is a single atomic store,
/// so it is safe to call while holding a lock.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

impl CancellationToken {
    /// Create a token that only fires when cancelled explicitly.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create a token that also fires once `timeout` has elapsed.
    ///
    /// A timeout too large to represent means no deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => Self::with_deadline(deadline),
            None => Self::new(),
        }
    }

    /// Create a token that also fires at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self::build(Some(deadline))
    }

    fn build(deadline: Option<Instant>) -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                deadline,
            }),
        }
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
    }

    /// Deadline attached to this token, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Returns the reason this token has fired, if it has.
    ///
    /// Explicit cancellation takes precedence over an elapsed deadline.
    pub fn error(&self) -> Option<AnalyzeError> {
        if self.inner.cancelled.load(Ordering::SeqCst) {
            return Some(AnalyzeError::Cancelled);
        }
        match self.inner.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(AnalyzeError::DeadlineExceeded),
            _ => None,
        }
    }

    /// True once the token was cancelled or its deadline passed.
    pub fn is_cancelled(&self) -> bool {
        self.error().is_some()
    }

    /// `Err` with the firing reason, `Ok` while work may continue.
    pub fn check(&self) -> Result<(), AnalyzeError> {
        match self.error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
