//! Rusty Reclaim - Cleanup rule analysis
//!
//! This crate provides functionality for:
//! - Loading declarative cleaner rules and detecting which apply to the host
//! - Measuring reclaimable bytes and file counts without deleting anything
//! - Cancelling a running analysis through a single-flight abort coordinator

pub mod abort;
pub mod analyzer;
pub mod cancel;
pub mod cli;
pub mod commands;
pub mod config;
pub mod detect;
pub mod error;
pub mod probe;
pub mod rules;
pub mod signals;

// Re-export commonly used types
pub use analyzer::{AnalyzeItem, AnalyzeOptions, AnalyzeResponse, Analyzer, CleanRequest};
pub use cancel::CancellationToken;
pub use config::Config;
pub use error::{AnalyzeError, ReclaimError, Result};
pub use rules::{RuleCatalog, RuleIndex};
