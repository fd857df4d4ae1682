//! Next-score forecast over a student's score trend.
//!
//! The slope is the endpoint difference over the most recent window, not a
//! regression fit, and consistency is `100 - mean absolute deviation`. Both
//! are heuristics whose exact output is relied on by dashboards, so the
//! formulas stay as they are. Consistency is not clamped and can drop below
//! zero for erratic histories.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analytics::{mean, TrendPoint};
use crate::config::PredictionConfig;

/// Direction of recent scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendLabel {
    Improving,
    Stable,
    Declining,
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendLabel::Improving => write!(f, "improving"),
            TrendLabel::Stable => write!(f, "stable"),
            TrendLabel::Declining => write!(f, "declining"),
        }
    }
}

/// Forecast result. Thin history is a value, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Prediction {
    /// Not enough graded attempts to forecast.
    Unavailable { needed: usize, have: usize },
    Available {
        /// Projected next score in `[0, 100]`.
        predicted: f64,
        /// Score change per attempt over the window.
        slope: f64,
        trend: TrendLabel,
        /// `round(100 - MAD)` over the whole trend.
        consistency: i64,
    },
}

impl Prediction {
    pub fn is_available(&self) -> bool {
        matches!(self, Prediction::Available { .. })
    }
}

/// Forecast with the default parameters.
pub fn predict(trend: &[TrendPoint]) -> Prediction {
    predict_with(trend, &PredictionConfig::default())
}

pub fn predict_with(trend: &[TrendPoint], config: &PredictionConfig) -> Prediction {
    let needed = config.min_history.max(2);
    if trend.len() < needed {
        return Prediction::Unavailable {
            needed,
            have: trend.len(),
        };
    }

    let window = &trend[trend.len() - config.window.max(2).min(trend.len())..];
    let first = window[0].score;
    let last = window[window.len() - 1].score;
    let slope = (last - first) / (window.len() - 1) as f64;
    let predicted = (last + slope * f64::from(config.horizon)).clamp(0.0, 100.0);

    let label = if slope > config.stable_band {
        TrendLabel::Improving
    } else if slope < -config.stable_band {
        TrendLabel::Declining
    } else {
        TrendLabel::Stable
    };

    let scores: Vec<f64> = trend.iter().map(|p| p.score).collect();
    let consistency = (100.0 - mean_absolute_deviation(&scores)).round() as i64;

    tracing::debug!(points = trend.len(), slope, predicted, "prediction computed");

    Prediction::Available {
        predicted,
        slope,
        trend: label,
        consistency,
    }
}

fn mean_absolute_deviation(values: &[f64]) -> f64 {
    let avg = mean(values);
    let deviations: Vec<f64> = values.iter().map(|v| (v - avg).abs()).collect();
    mean(&deviations)
}
