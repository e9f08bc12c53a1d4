//! Analysis engine.
//!
//! Turns a batch of [`CleanRequest`]s into an [`AnalyzeResponse`] by probing
//! every applicable action of every requested option. Nothing is deleted.

mod aggregate;
mod engine;
mod types;

pub use aggregate::analyze_actions;
pub use engine::{AnalyzeOptions, Analyzer};
pub use types::{AnalyzeItem, AnalyzeResponse, CleanRequest};
