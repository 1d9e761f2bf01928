//! Configuration loading and extractor factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizbank_core::traits::TextExtractor;

use crate::http::{HttpTextExtractor, DEFAULT_TIMEOUT_SECS};

/// Environment variable that overrides the extraction endpoint.
pub const ENDPOINT_ENV_VAR: &str = "QUIZBANK_EXTRACT_URL";

/// Settings for the remote text extraction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Full URL the PDF is POSTed to.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Largest PDF accepted for upload, in MiB.
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
}

fn default_endpoint() -> String {
    "http://localhost:9000/default/extract".to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_max_file_size_mb() -> u64 {
    10
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout(),
            max_file_size_mb: default_max_file_size_mb(),
        }
    }
}

/// Defaults for `quizbank practice`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PracticeConfig {
    /// Shuffle question order.
    #[serde(default)]
    pub shuffle: bool,
    /// Practice at most this many questions.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Top-level quizbank configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizbankConfig {
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub practice: PracticeConfig,
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizbank.toml` in the current directory
/// 2. `~/.config/quizbank/config.toml`
///
/// `QUIZBANK_EXTRACT_URL` overrides the extractor endpoint.
pub fn load_config() -> Result<QuizbankConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizbankConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizbank.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            parse_config_str(
                &std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config: {}", path.display()))?,
            )
            .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizbankConfig::default(),
    };

    if let Ok(endpoint) = std::env::var(ENDPOINT_ENV_VAR) {
        config.extractor.endpoint = endpoint;
    }

    Ok(config)
}

/// Parse a TOML config string and expand `${VAR}` references.
pub fn parse_config_str(content: &str) -> Result<QuizbankConfig> {
    let mut config: QuizbankConfig = toml::from_str(content)?;
    config.extractor.endpoint = resolve_env_vars(&config.extractor.endpoint);
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizbank"))
}

/// Create the text extractor described by `config`.
pub fn create_extractor(config: &ExtractorConfig) -> Result<Box<dyn TextExtractor>> {
    anyhow::ensure!(
        config.endpoint.starts_with("http://") || config.endpoint.starts_with("https://"),
        "extractor endpoint must be an http(s) URL, got '{}'",
        config.endpoint
    );

    let extractor = HttpTextExtractor::new(&config.endpoint, config.timeout_secs)?
        .with_max_file_size(config.max_file_size_mb * 1024 * 1024);
    Ok(Box::new(extractor))
}
