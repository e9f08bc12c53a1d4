//! Host detection.
//!
//! This module provides:
//! - OS applicability filtering for actions and registry checks
//! - Installed-target detection for cleaners
//! - The registry seam used by detection on Windows

mod detector;
pub mod os;
pub mod registry;

pub use detector::{is_installed, path_exists, Detector};
pub use os::{applies, current_os};
pub use registry::{RegistryProbe, SystemRegistry};
