//! Loads cleaner definitions from a directory of JSON files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::cancel::CancellationToken;
use crate::detect::Detector;
use crate::error::{AnalyzeError, ReclaimError, Result};
use crate::rules::Cleaner;

/// Directory-backed rule store.
pub struct RuleCatalog {
    dir: PathBuf,
    detector: Detector,
}

impl RuleCatalog {
    /// Catalog over `dir`, detecting against the current host.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            detector: Detector::for_host(),
        }
    }

    /// Replace the detector used by [`RuleCatalog::filter_installed`].
    pub fn with_detector(mut self, detector: Detector) -> Self {
        self.detector = detector;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load every `*.json` file in the rule directory, in file name order.
    ///
    /// Unreadable or malformed files are logged and skipped; only a missing
    /// or unreadable directory is an error.
    pub fn load_rules(&self) -> Result<Vec<Cleaner>> {
        let read_dir = fs::read_dir(&self.dir).map_err(|e| ReclaimError::Io {
            path: self.dir.clone(),
            source: e,
        })?;

        let mut files: Vec<PathBuf> = read_dir
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();

        let mut cleaners = Vec::with_capacity(files.len());
        for path in files {
            match Self::load_file(&path) {
                Ok(cleaner) => {
                    tracing::info!(cleaner = %cleaner.name, file = %path.display(), "Loaded cleaner");
                    cleaners.push(cleaner);
                }
                Err(err) => {
                    tracing::warn!("Skipping rule file: {}", err);
                }
            }
        }

        tracing::debug!(count = cleaners.len(), "Total cleaners");
        Ok(cleaners)
    }

    /// Parse a single rule file.
    pub fn load_file(path: &Path) -> Result<Cleaner> {
        let data = fs::read_to_string(path).map_err(|e| ReclaimError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&data).map_err(|e| ReclaimError::RuleParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Keep only the cleaners whose target is installed on this host.
    pub fn filter_installed(&self, cleaners: Vec<Cleaner>) -> Vec<Cleaner> {
        cleaners
            .into_iter()
            .filter(|c| self.detector.is_installed(&c.detect))
            .collect()
    }

    /// Like [`RuleCatalog::filter_installed`], giving up once `token` fires.
    pub fn filter_installed_until(
        &self,
        cleaners: Vec<Cleaner>,
        token: &CancellationToken,
    ) -> std::result::Result<Vec<Cleaner>, AnalyzeError> {
        let total = cleaners.len();
        let mut installed = Vec::new();
        for cleaner in cleaners {
            token.check()?;
            if self.detector.is_installed(&cleaner.detect) {
                installed.push(cleaner);
            }
        }
        tracing::debug!(
            os = self.detector.os(),
            total,
            installed = installed.len(),
            "Detected installed cleaners"
        );
        Ok(installed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_rule(dir: &Path, file: &str, id: &str, detect: &str) {
        let json = format!(
            r#"{{"id": "{id}", "name": "{id}", "detect": {detect}, "options": [{{"id": "all", "actions": []}}]}}"#
        );
        fs::write(dir.join(file), json).unwrap();
    }

    #[test]
    fn test_load_rules_reads_json_files_in_order() {
        let tmp = TempDir::new().unwrap();
        write_rule(tmp.path(), "b.json", "beta", r#"{"type": "always"}"#);
        write_rule(tmp.path(), "a.json", "alpha", r#"{"type": "always"}"#);
        fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();

        let cleaners = RuleCatalog::new(tmp.path()).load_rules().unwrap();

        let ids: Vec<&str> = cleaners.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_load_rules_skips_malformed_files() {
        let tmp = TempDir::new().unwrap();
        write_rule(tmp.path(), "good.json", "good", r#"{"type": "always"}"#);
        fs::write(tmp.path().join("bad.json"), "{ not json").unwrap();

        let cleaners = RuleCatalog::new(tmp.path()).load_rules().unwrap();

        assert_eq!(cleaners.len(), 1);
        assert_eq!(cleaners[0].id, "good");
    }

    #[test]
    fn test_load_rules_missing_dir_is_error() {
        let result = RuleCatalog::new("/nonexistent/rules/12345").load_rules();
        assert!(matches!(result, Err(ReclaimError::Io { .. })));
    }

    #[test]
    fn test_load_file_reports_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        fs::write(&path, "[]").unwrap();

        let result = RuleCatalog::load_file(&path);
        assert!(matches!(result, Err(ReclaimError::RuleParse { .. })));
    }

    #[test]
    fn test_filter_installed() {
        let tmp = TempDir::new().unwrap();
        let present = tmp.path().join("present");
        fs::create_dir(&present).unwrap();

        let rules = tmp.path().join("rules");
        fs::create_dir(&rules).unwrap();
        write_rule(&rules, "1.json", "always", r#"{"type": "always"}"#);
        write_rule(
            &rules,
            "2.json",
            "here",
            &format!(r#"{{"type": "dir", "paths": ["{}"]}}"#, present.display()),
        );
        write_rule(
            &rules,
            "3.json",
            "gone",
            r#"{"type": "dir", "paths": ["/nonexistent/app/12345"]}"#,
        );

        let catalog = RuleCatalog::new(&rules);
        let installed = catalog.filter_installed(catalog.load_rules().unwrap());

        let ids: Vec<&str> = installed.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["always", "here"]);
    }

    #[test]
    fn test_filter_installed_until_cancelled() {
        let tmp = TempDir::new().unwrap();
        write_rule(tmp.path(), "a.json", "alpha", r#"{"type": "always"}"#);

        let catalog = RuleCatalog::new(tmp.path());
        let cleaners = catalog.load_rules().unwrap();

        let token = CancellationToken::new();
        token.cancel();

        let result = catalog.filter_installed_until(cleaners, &token);
        assert_eq!(result.unwrap_err(), AnalyzeError::Cancelled);
    }

    #[test]
    fn test_filter_installed_until_live_token() {
        let tmp = TempDir::new().unwrap();
        write_rule(tmp.path(), "a.json", "alpha", r#"{"type": "always"}"#);
        write_rule(
            tmp.path(),
            "b.json",
            "beta",
            r#"{"type": "dir", "paths": ["/nonexistent/app/12345"]}"#,
        );

        let catalog = RuleCatalog::new(tmp.path());
        let cleaners = catalog.load_rules().unwrap();

        let installed = catalog
            .filter_installed_until(cleaners, &CancellationToken::new())
            .unwrap();
        let ids: Vec<&str> = installed.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha"]);
        assert_eq!(catalog.dir(), tmp.path());
    }
}
