//! Declarative cleaner definitions, as stored in the rule files.

use serde::{Deserialize, Serialize};

/// A cleanable application or subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cleaner {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Display flag, carried through for front ends.
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub detect: Detection,
    #[serde(default)]
    pub options: Vec<CleanOption>,
}

/// Describes how to decide whether a cleaner's target is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    /// "always", "file", "dir" or "registry"
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Candidate paths; may contain placeholders and wildcards.
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default)]
    pub registry: Vec<RegistryCheck>,
}

impl Detection {
    pub const ALWAYS: &'static str = "always";

    /// A detection that matches on every host.
    pub fn always() -> Self {
        Self {
            kind: Self::ALWAYS.to_string(),
            ..Default::default()
        }
    }

    pub fn is_always(&self) -> bool {
        self.kind.eq_ignore_ascii_case(Self::ALWAYS)
    }
}

/// A registry key whose presence signals an installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryCheck {
    /// e.g. `HKLM\SOFTWARE\Vendor\App`
    pub key: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub os: Vec<String>,
}

/// Named sub-rule of a cleaner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanOption {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// One filesystem probe instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// "delete", "truncate" or "vacuum". Analysis never executes it.
    #[serde(default)]
    pub command: String,
    /// "file", "glob" or "walk.files"
    #[serde(default)]
    pub search: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub os: Vec<String>,
}

impl Action {
    pub fn new(search: &str, path: impl Into<String>) -> Self {
        Self {
            command: "delete".to_string(),
            search: search.to_string(),
            path: path.into(),
            os: Vec::new(),
        }
    }

    /// Restrict the action to the given hosts.
    pub fn with_os(mut self, os: &[&str]) -> Self {
        self.os = os.iter().map(|s| s.to_string()).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_cleaner() {
        let json = r#"{
            "id": "firefox",
            "name": "Firefox",
            "description": "Web browser",
            "detect": {
                "type": "dir",
                "paths": ["$HOME/.mozilla/firefox"],
                "registry": [{"key": "HKLM\\SOFTWARE\\Mozilla", "os": ["windows"]}]
            },
            "options": [{
                "id": "cache",
                "label": "Cache",
                "description": "Cached web pages",
                "warning": "Logs you out of nothing",
                "actions": [
                    {"command": "delete", "search": "walk.files", "path": "$HOME/.cache/mozilla"},
                    {"command": "delete", "search": "glob", "path": "%LocalAppData%\\Mozilla\\*", "os": ["windows"]}
                ]
            }]
        }"#;

        let cleaner: Cleaner = serde_json::from_str(json).unwrap();

        assert_eq!(cleaner.id, "firefox");
        assert_eq!(cleaner.detect.kind, "dir");
        assert_eq!(cleaner.detect.registry[0].os, vec!["windows"]);
        assert_eq!(cleaner.options.len(), 1);
        assert_eq!(cleaner.options[0].actions.len(), 2);
        assert_eq!(cleaner.options[0].actions[1].os, vec!["windows"]);
        assert!(!cleaner.running);
    }

    #[test]
    fn test_parse_minimal_cleaner_uses_defaults() {
        let json = r#"{"id": "tmp", "name": "Temp", "options": [{"id": "all", "actions": [{"path": "/tmp/x"}]}]}"#;

        let cleaner: Cleaner = serde_json::from_str(json).unwrap();

        assert_eq!(cleaner.detect, Detection::default());
        assert!(cleaner.options[0].warning.is_none());
        assert_eq!(cleaner.options[0].actions[0].search, "");
        assert!(cleaner.options[0].actions[0].os.is_empty());
    }

    #[test]
    fn test_detection_always() {
        assert!(Detection::always().is_always());
        assert!(!Detection::default().is_always());

        let detection = Detection {
            kind: "Always".into(),
            ..Default::default()
        };
        assert!(detection.is_always());
    }

    #[test]
    fn test_detection_kind_serializes_as_type() {
        let json = serde_json::to_string(&Detection::always()).unwrap();
        assert!(json.contains(r#""type":"always""#));
    }

    #[test]
    fn test_action_builder() {
        let action = Action::new("glob", "/var/log/*.log").with_os(&["linux"]);
        assert_eq!(action.search, "glob");
        assert_eq!(action.os, vec!["linux"]);
    }
}
