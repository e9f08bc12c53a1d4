//! Decides whether a cleaner's target is present on the host.

use std::fs;

use crate::detect::os::{applies, current_os};
use crate::detect::registry::{RegistryProbe, SystemRegistry};
use crate::probe::glob::GlobMatches;
use crate::probe::resolve::{has_wildcard, resolve};
use crate::rules::Detection;

/// Evaluates [`Detection`] descriptors against one host.
pub struct Detector {
    os: String,
    registry: Box<dyn RegistryProbe>,
}

impl Detector {
    /// Detector for the running host and its registry.
    pub fn for_host() -> Self {
        Self::new(current_os(), SystemRegistry)
    }

    /// Detector for an explicit host identifier and registry source.
    pub fn new(os: impl Into<String>, registry: impl RegistryProbe + 'static) -> Self {
        Self {
            os: os.into(),
            registry: Box::new(registry),
        }
    }

    /// Host identifier used for registry applicability.
    pub fn os(&self) -> &str {
        &self.os
    }

    /// Check whether the described target is installed.
    ///
    /// - `always`, or nothing declared, is installed.
    /// - Otherwise any existing path wins, checked in order.
    /// - Registry checks count only where the registry is supported and the
    ///   check applies to this host.
    pub fn is_installed(&self, detection: &Detection) -> bool {
        if detection.is_always() || (detection.paths.is_empty() && detection.registry.is_empty()) {
            return true;
        }

        if detection.paths.iter().any(|p| path_exists(p)) {
            return true;
        }

        if !self.registry.is_supported() {
            return false;
        }

        detection
            .registry
            .iter()
            .any(|check| applies(&check.os, &self.os) && self.registry.key_exists(&check.key))
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::for_host()
    }
}

/// Check a detection against the running host.
pub fn is_installed(detection: &Detection) -> bool {
    Detector::for_host().is_installed(detection)
}

/// True if the placeholder-expanded `pattern` names at least one existing path.
///
/// Wildcard patterns stop at the first match.
pub fn path_exists(pattern: &str) -> bool {
    let expanded = resolve(pattern);

    if has_wildcard(&expanded) {
        return match GlobMatches::new(&expanded) {
            Ok(mut matches) => matches.next().is_some(),
            Err(err) => {
                tracing::debug!("Invalid detection pattern {}: {}", expanded.display(), err);
                false
            }
        };
    }

    fs::metadata(&expanded).is_ok()
}
