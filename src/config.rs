// src/config.rs
//! Service configuration: built-in defaults, then an optional TOML file, then env.
//!
//! File lookup:
//! 1) $SERVICES_CONFIG_PATH (must exist)
//! 2) config/services.toml (if present)

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/services.toml";
pub const ENV_CONFIG_PATH: &str = "SERVICES_CONFIG_PATH";

pub const ENV_SCORE_HOST: &str = "SAFETY_SCORE_HOST";
pub const ENV_SCORE_PORT: &str = "SAFETY_SCORE_PORT";
pub const ENV_REPORT_HOST: &str = "CASE_REPORT_HOST";
pub const ENV_REPORT_PORT: &str = "CASE_REPORT_PORT";
pub const ENV_REPORT_OUTPUT_DIR: &str = "CASE_REPORT_OUTPUT_DIR";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
pub const ENV_METRICS_ENABLED: &str = "METRICS_ENABLED";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_SCORE_PORT: u16 = 8001;
pub const DEFAULT_REPORT_PORT: u16 = 8002;

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_score_port() -> u16 {
    DEFAULT_SCORE_PORT
}
fn default_report_port() -> u16 {
    DEFAULT_REPORT_PORT
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_directive() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_score_port")]
    pub port: u16,
}

impl Default for ScoreSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_score_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_report_port")]
    pub port: u16,
    /// Where generated PDFs land. Relative paths resolve against the working dir.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_report_port(),
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSection {
    #[serde(default)]
    pub format: LogFormat,
    /// Used when RUST_LOG is unset.
    #[serde(default = "default_directive")]
    pub default_directive: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            default_directive: default_directive(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsSection {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServicesConfig {
    #[serde(default)]
    pub score: ScoreSection,
    #[serde(default)]
    pub report: ReportSection,
    #[serde(default)]
    pub log: LogSection,
    #[serde(default)]
    pub metrics: MetricsSection,
}

impl ScoreSection {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ReportSection {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ServicesConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing services config")
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading services config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Defaults, then file, then process environment.
    pub fn load() -> Result<Self> {
        let mut cfg = match std::env::var(ENV_CONFIG_PATH) {
            Ok(p) => {
                let pb = PathBuf::from(p);
                if !pb.exists() {
                    return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
                }
                Self::load_from(&pb)?
            }
            Err(_) => {
                let pb = PathBuf::from(DEFAULT_CONFIG_PATH);
                if pb.exists() {
                    Self::load_from(&pb)?
                } else {
                    Self::default()
                }
            }
        };
        cfg.apply_env_from(|k| std::env::var(k).ok());
        Ok(cfg)
    }

    /// Apply overrides from any key/value source. Unparseable values are
    /// skipped with a warning and the previous setting stands.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(h) = non_empty(lookup(ENV_SCORE_HOST)) {
            self.score.host = h;
        }
        if let Some(p) = parse_port(ENV_SCORE_PORT, lookup(ENV_SCORE_PORT)) {
            self.score.port = p;
        }
        if let Some(h) = non_empty(lookup(ENV_REPORT_HOST)) {
            self.report.host = h;
        }
        if let Some(p) = parse_port(ENV_REPORT_PORT, lookup(ENV_REPORT_PORT)) {
            self.report.port = p;
        }
        if let Some(d) = non_empty(lookup(ENV_REPORT_OUTPUT_DIR)) {
            self.report.output_dir = PathBuf::from(d);
        }
        if let Some(f) = non_empty(lookup(ENV_LOG_FORMAT)) {
            match f.to_ascii_lowercase().as_str() {
                "json" => self.log.format = LogFormat::Json,
                "compact" => self.log.format = LogFormat::Compact,
                other => warn!(value = other, "ignoring unknown {ENV_LOG_FORMAT}"),
            }
        }
        if let Some(m) = non_empty(lookup(ENV_METRICS_ENABLED)) {
            self.metrics.enabled = matches!(m.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn parse_port(key: &str, raw: Option<String>) -> Option<u16> {
    let raw = non_empty(raw)?;
    match raw.parse::<u16>() {
        Ok(p) => Some(p),
        Err(_) => {
            warn!(key, value = %raw, "ignoring invalid port override");
            None
        }
    }
}
