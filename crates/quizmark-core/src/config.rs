//! Analytics configuration.
//!
//! Every field has a default, so a missing or partial `quizmark.toml` yields
//! the standard thresholds: pass mark 50, strengths at 70 and above, three
//! highlighted topics, predictions from at least three attempts.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Thresholds used by the analytics transforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Scores at or above this count as a pass.
    #[serde(default = "default_pass_mark")]
    pub pass_mark: f64,
    /// Topic accuracy at or above this is a strength, below it a weakness.
    #[serde(default = "default_strength_threshold")]
    pub strength_threshold: u32,
    /// How many strengths and weaknesses to report.
    #[serde(default = "default_highlight_count")]
    pub highlight_count: usize,
    #[serde(default)]
    pub prediction: PredictionConfig,
}

/// Parameters of the next-score forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionConfig {
    /// Fewer trend points than this and the prediction is unavailable.
    #[serde(default = "default_min_history")]
    pub min_history: usize,
    /// Number of most recent points the slope is taken over.
    #[serde(default = "default_window")]
    pub window: usize,
    /// Steps ahead the slope is projected.
    #[serde(default = "default_horizon")]
    pub horizon: u32,
    /// Slopes within `±stable_band` are labelled stable.
    #[serde(default = "default_stable_band")]
    pub stable_band: f64,
}

fn default_pass_mark() -> f64 {
    50.0
}
fn default_strength_threshold() -> u32 {
    70
}
fn default_highlight_count() -> usize {
    3
}
fn default_min_history() -> usize {
    3
}
fn default_window() -> usize {
    5
}
fn default_horizon() -> u32 {
    2
}
fn default_stable_band() -> f64 {
    1.0
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            pass_mark: default_pass_mark(),
            strength_threshold: default_strength_threshold(),
            highlight_count: default_highlight_count(),
            prediction: PredictionConfig::default(),
        }
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            min_history: default_min_history(),
            window: default_window(),
            horizon: default_horizon(),
            stable_band: default_stable_band(),
        }
    }
}

/// Top-level layout of `quizmark.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    analytics: AnalyticsConfig,
}

/// Parse a `quizmark.toml` document.
pub fn parse_config_str(content: &str) -> Result<AnalyticsConfig> {
    let file: ConfigFile = toml::from_str(content).context("failed to parse config TOML")?;
    Ok(file.analytics)
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizmark.toml` in the current directory
/// 2. `~/.config/quizmark/config.toml`
///
/// Environment variable override: `QUIZMARK_PASS_MARK`.
pub fn load_config() -> Result<AnalyticsConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<AnalyticsConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizmark.toml");
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
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to load config: {}", path.display()))?
        }
        None => AnalyticsConfig::default(),
    };

    if let Ok(raw) = std::env::var("QUIZMARK_PASS_MARK") {
        config.pass_mark = raw
            .trim()
            .parse()
            .with_context(|| format!("invalid QUIZMARK_PASS_MARK: {raw}"))?;
    }

    anyhow::ensure!(
        (0.0..=100.0).contains(&config.pass_mark),
        "pass_mark must be between 0 and 100"
    );
    anyhow::ensure!(
        config.prediction.window >= 2,
        "prediction.window must be at least 2"
    );

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizmark"))
}
