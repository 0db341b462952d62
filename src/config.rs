//! Client configuration: built-in defaults, an optional TOML file, then CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://cv-analysis-api.example.com";
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub max_file_size: u64,
    pub supported_types: Vec<String>,
    #[serde(with = "humantime_serde")]
    pub toast_duration: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            supported_types: vec!["application/pdf".to_string()],
            toast_duration: DEFAULT_TOAST_DURATION,
        }
    }
}

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub max_file_size: Option<u64>,
    pub supported_types: Option<Vec<String>>,
    #[serde(default, with = "humantime_serde")]
    pub toast_duration: Option<Duration>,
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub max_file_size: Option<u64>,
    pub toast_duration: Option<Duration>,
}

impl ClientConfig {
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Self {
        let mut cfg = ClientConfig::default();
        if let Some(v) = file.base_url {
            cfg.base_url = v;
        }
        if let Some(v) = file.max_file_size {
            cfg.max_file_size = v;
        }
        if let Some(v) = file.supported_types.filter(|t| !t.is_empty()) {
            cfg.supported_types = v;
        }
        if let Some(v) = file.toast_duration {
            cfg.toast_duration = v;
        }

        if let Some(v) = overrides.base_url {
            cfg.base_url = v;
        }
        if let Some(v) = overrides.max_file_size {
            cfg.max_file_size = v;
        }
        if let Some(v) = overrides.toast_duration {
            cfg.toast_duration = v;
        }

        cfg.base_url = cfg.base_url.trim().trim_end_matches('/').to_string();
        cfg
    }
}

/// `<config dir>/cv-analysis/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cv-analysis").join("config.toml"))
}

pub fn parse_file_config(content: &str) -> Result<FileConfig> {
    toml::from_str(content).context("failed to parse config TOML")
}

/// Load the config file. An explicit path must exist; the default path is optional.
pub fn load_file_config(explicit: Option<&Path>) -> Result<FileConfig> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(FileConfig::default()),
        },
    };
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg = parse_file_config(&content).with_context(|| format!("in {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.max_file_size, 10 * 1024 * 1024);
        assert_eq!(cfg.supported_types, vec!["application/pdf".to_string()]);
        assert_eq!(cfg.toast_duration, Duration::from_secs(3));
    }

    #[test]
    fn file_then_cli_precedence() {
        let file = parse_file_config(
            r#"
            base_url = "https://file.example.com/"
            max_file_size = 1024
            toast_duration = "5s"
            "#,
        )
        .unwrap();
        let cfg = ClientConfig::resolve(
            file,
            Overrides {
                max_file_size: Some(2048),
                ..Default::default()
            },
        );
        assert_eq!(cfg.base_url, "https://file.example.com");
        assert_eq!(cfg.max_file_size, 2048);
        assert_eq!(cfg.toast_duration, Duration::from_secs(5));
        assert_eq!(cfg.supported_types, vec!["application/pdf".to_string()]);
    }

    #[test]
    fn empty_type_list_keeps_default() {
        let file = parse_file_config("supported_types = []").unwrap();
        let cfg = ClientConfig::resolve(file, Overrides::default());
        assert_eq!(cfg.supported_types, vec!["application/pdf".to_string()]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_file_config("base_uri = \"x\"").is_err());
    }

    #[test]
    fn load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "base_url = \"http://localhost:9000\"\n").unwrap();
        let file = load_file_config(Some(&path)).unwrap();
        assert_eq!(file.base_url.as_deref(), Some("http://localhost:9000"));

        assert!(load_file_config(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
