use rusty_reclaim::config::Config;
use rusty_reclaim::error::ConfigError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[test]
fn parse_complete_config_file() {
    let config_content = r#"
[rules]
dir = "/usr/share/rusty-reclaim/rules"

[analysis]
workers = 4
sample_cap = 100
walk_channel_capacity = 16
timeout_secs = 30

[detection]
timeout_secs = 5
"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(config_content.as_bytes()).unwrap();

    let config = Config::load(Some(file.path())).unwrap();

    assert_eq!(config.rules.dir, PathBuf::from("/usr/share/rusty-reclaim/rules"));
    assert_eq!(config.analysis.workers, 4);
    assert_eq!(config.analysis.sample_cap, 100);
    assert_eq!(config.analysis.walk_channel_capacity, 16);
    assert_eq!(config.analysis.timeout_secs, 30);
    assert_eq!(config.detection.timeout_secs, 5);
}

#[test]
fn parse_partial_config_uses_defaults() {
    let config_content = r#"
[analysis]
timeout_secs = 120
"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(config_content.as_bytes()).unwrap();

    let config = Config::load(Some(file.path())).unwrap();

    // Explicit value
    assert_eq!(config.analysis.timeout_secs, 120);
    // Default values
    assert_eq!(config.analysis.sample_cap, 500);
    assert_eq!(config.detection.timeout_secs, 60);
    assert_eq!(config.rules.dir, PathBuf::from("resources"));
}

#[test]
fn empty_config_file_uses_defaults() {
    let file = NamedTempFile::new().unwrap();
    let config = Config::load(Some(file.path())).unwrap();
    assert_eq!(config.analysis.walk_channel_capacity, 100);
}

#[test]
fn parse_invalid_toml_returns_error() {
    let config_content = "this is not valid toml [[[";

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(config_content.as_bytes()).unwrap();

    let result = Config::load(Some(file.path()));
    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
fn parse_zero_sample_cap_returns_error() {
    let config_content = r#"
[analysis]
sample_cap = 0
"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(config_content.as_bytes()).unwrap();

    let result = Config::load(Some(file.path()));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn missing_explicit_config_returns_error() {
    let result = Config::load(Some(Path::new("/nonexistent/rusty-reclaim/config.toml")));
    assert!(matches!(result, Err(ConfigError::ReadError { .. })));
}
