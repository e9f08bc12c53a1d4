//! Subcommand implementations.

pub mod analyze;
pub mod rules;

use crate::error::{AnalyzeError, ReclaimError};

/// Exit status for a successful run.
pub const EXIT_OK: u8 = 0;
/// Exit status for any failure other than an aborted analysis.
pub const EXIT_ERROR: u8 = 1;
/// Exit status when the analysis was cancelled.
pub const EXIT_CANCELLED: u8 = 3;
/// Exit status when the analysis hit its deadline.
pub const EXIT_TIMEOUT: u8 = 4;

/// Map a command failure to the process exit status.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    let analyze = err.downcast_ref::<AnalyzeError>().copied().or_else(|| {
        match err.downcast_ref::<ReclaimError>() {
            Some(ReclaimError::Analyze(inner)) => Some(*inner),
            _ => None,
        }
    });

    match analyze {
        Some(AnalyzeError::Cancelled) => EXIT_CANCELLED,
        Some(AnalyzeError::DeadlineExceeded) => EXIT_TIMEOUT,
        None => EXIT_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&AnalyzeError::Cancelled.into()), EXIT_CANCELLED);
        assert_eq!(exit_code(&AnalyzeError::DeadlineExceeded.into()), EXIT_TIMEOUT);
        assert_eq!(
            exit_code(&ReclaimError::Analyze(AnalyzeError::DeadlineExceeded).into()),
            EXIT_TIMEOUT
        );
        assert_eq!(exit_code(&anyhow::anyhow!("boom")), EXIT_ERROR);
    }

    #[test]
    fn test_context_keeps_exit_code() {
        let err = anyhow::Error::from(AnalyzeError::Cancelled).context("Analysis failed");
        assert_eq!(exit_code(&err), EXIT_CANCELLED);
    }
}
