//! Service configuration: per-backend threshold tables, suggestion
//! templates, and request limits.
//!
//! Loaded once at startup from `config/moderation.toml`. The path can be
//! overridden with `MODERATION_CONFIG_PATH`; when the file is missing the
//! copy embedded at compile time is used, so the service always boots with
//! a valid table set. `MODERATION_OFFENSIVE_CUTOFF` overrides the cutoff
//! from the environment (clamped to `[0, 1]`).

use anyhow::{anyhow, bail};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::score::ThresholdTable;
use crate::sentiment::Method;
use crate::suggest::SuggestionTemplates;

pub const DEFAULT_CONFIG_PATH: &str = "config/moderation.toml";

pub const ENV_CONFIG_PATH: &str = "MODERATION_CONFIG_PATH";
pub const ENV_OFFENSIVE_CUTOFF: &str = "MODERATION_OFFENSIVE_CUTOFF";

const EMBEDDED_CONFIG: &str = include_str!("../config/moderation.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct ModerationConfig {
    pub service: ServiceSection,
    pub thresholds: HashMap<String, ThresholdTable>,
    pub suggestions: SuggestionTemplates,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceSection {
    pub default_method: String,
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,
    #[serde(default = "default_max_batch_items")]
    pub max_batch_items: usize,
    #[serde(default = "default_backend_timeout_ms")]
    pub backend_timeout_ms: u64,
    #[serde(default = "default_offensive_cutoff")]
    pub offensive_cutoff: f32,
    #[serde(default = "default_long_text_limit")]
    pub long_text_limit: usize,
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

fn default_max_text_length() -> usize {
    1000
}
fn default_max_batch_items() -> usize {
    50
}
fn default_backend_timeout_ms() -> u64 {
    2000
}
fn default_offensive_cutoff() -> f32 {
    0.4
}
fn default_long_text_limit() -> usize {
    280
}
fn default_max_suggestions() -> usize {
    5
}

// parse optional float env and clamp to <0.0..=1.0>
fn parse_cutoff_env(raw: Option<String>) -> Option<f32> {
    raw.and_then(|s| s.trim().parse::<f32>().ok())
        .map(|v| v.clamp(0.0, 1.0))
}

impl ModerationConfig {
    /// Load from disk (or the embedded copy) and apply env overrides.
    pub fn from_env() -> anyhow::Result<Self> {
        let path = std::env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let content = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(_) => {
                info!(path = %path.display(), "config file not found; using embedded defaults");
                EMBEDDED_CONFIG.to_string()
            }
        };

        let mut cfg = Self::from_toml_str(&content)?;

        if let Some(cutoff) = parse_cutoff_env(std::env::var(ENV_OFFENSIVE_CUTOFF).ok()) {
            cfg.service.offensive_cutoff = cutoff;
        }

        Ok(cfg)
    }

    /// The compile-time default configuration.
    pub fn embedded() -> anyhow::Result<Self> {
        Self::from_toml_str(EMBEDDED_CONFIG)
    }

    /// Load from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let cfg: ModerationConfig = toml::from_str(toml_str)?;
        cfg.check()?;
        Ok(cfg)
    }

    fn check(&self) -> anyhow::Result<()> {
        let default = Method::parse(&self.service.default_method).ok_or_else(|| {
            anyhow!(
                "unknown default_method `{}`; available: {}",
                self.service.default_method,
                available_methods()
            )
        })?;
        if !self.thresholds.contains_key(default.as_str()) {
            bail!(
                "no threshold table for default method `{}`",
                default.as_str()
            );
        }
        for (name, table) in &self.thresholds {
            if !table.is_strictly_increasing() {
                bail!("thresholds for `{name}` must be strictly increasing");
            }
        }
        if !(0.0..=1.0).contains(&self.service.offensive_cutoff) {
            bail!("offensive_cutoff must lie in [0, 1]");
        }
        Ok(())
    }

    /// Parsed default method; `check()` guarantees the identifier is known.
    pub fn default_method(&self) -> Method {
        Method::parse(&self.service.default_method).unwrap_or(Method::Stars)
    }

    /// Threshold table for `method`, falling back to the default backend's
    /// table when none is configured. Never errors.
    pub fn thresholds_for(&self, method: Method) -> ThresholdTable {
        if let Some(table) = self.thresholds.get(method.as_str()) {
            return *table;
        }
        tracing::warn!(
            method = method.as_str(),
            "no threshold table configured; falling back to the default backend's table"
        );
        let default = self.default_method();
        self.thresholds
            .get(default.as_str())
            .copied()
            .unwrap_or_else(ThresholdTable::unit_default)
    }
}

fn available_methods() -> String {
    Method::ALL
        .iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
