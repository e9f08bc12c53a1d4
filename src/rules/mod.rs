//! Rule definitions and their lookup structures.
//!
//! This module provides:
//! - The serde model of cleaner rule files
//! - The per-analysis (cleaner, option) → actions index
//! - The directory-backed catalog with installed-host filtering

mod catalog;
mod index;
mod model;

pub use catalog::RuleCatalog;
pub use index::RuleIndex;
pub use model::{Action, CleanOption, Cleaner, Detection, RegistryCheck};
