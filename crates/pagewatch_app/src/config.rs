use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use watch_logging::watch_info;

use pagewatch_engine::FetchSettings;

/// Process configuration, read once at startup and passed by
/// reference into the pipeline. No ambient globals.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// File holding the ordered URL list (first column per line).
    pub urls_file: PathBuf,
    /// Directory holding one baseline file per watched URL.
    pub baseline_dir: PathBuf,
    /// Webhook endpoint for report delivery; reports are logged
    /// instead when unset.
    pub webhook_url: Option<String>,
    /// Extra fetch attempts after the first failure.
    pub max_retries: u32,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_body_bytes: u64,
    /// In-flight detection bound; 0 means unbounded.
    pub concurrency: usize,
    /// Display length cap for one diff line in a report.
    pub max_diff_line_len: usize,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            urls_file: PathBuf::from("urls.txt"),
            baseline_dir: PathBuf::from("baselines"),
            webhook_url: None,
            max_retries: 2,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            max_body_bytes: 5 * 1024 * 1024,
            concurrency: 0,
            max_diff_line_len: 120,
        }
    }
}

impl WatchConfig {
    /// Loads the RON config file; a missing file falls back to
    /// defaults, a malformed one is fatal.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                watch_info!("no config at {path:?}, using defaults");
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("cannot read config {path:?}"));
            }
        };
        ron::from_str(&text).with_context(|| format!("cannot parse config {path:?}"))
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_body_bytes,
            ..FetchSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::WatchConfig;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let config = WatchConfig::load(&temp.path().join("absent.ron")).unwrap();
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.concurrency, 0);
        assert!(config.webhook_url.is_none());
    }

    #[test]
    fn partial_config_overrides_only_named_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("watch.ron");
        fs::write(
            &path,
            r#"(urls_file: "pages.tsv", max_retries: 5, webhook_url: Some("https://hooks.example/x"))"#,
        )
        .unwrap();

        let config = WatchConfig::load(&path).unwrap();
        assert_eq!(config.urls_file, PathBuf::from("pages.tsv"));
        assert_eq!(config.max_retries, 5);
        assert_eq!(
            config.webhook_url.as_deref(),
            Some("https://hooks.example/x")
        );
        // Untouched fields keep their defaults.
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn malformed_config_is_fatal() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("watch.ron");
        fs::write(&path, "(urls_file: 42)").unwrap();
        assert!(WatchConfig::load(&path).is_err());
    }

    #[test]
    fn fetch_settings_carry_configured_timeouts() {
        let config = WatchConfig {
            connect_timeout_secs: 1,
            request_timeout_secs: 2,
            max_body_bytes: 3,
            ..WatchConfig::default()
        };
        let settings = config.fetch_settings();
        assert_eq!(settings.connect_timeout.as_secs(), 1);
        assert_eq!(settings.request_timeout.as_secs(), 2);
        assert_eq!(settings.max_bytes, 3);
    }
}
