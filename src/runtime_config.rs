// =============================================================================
// Engine Configuration — persisted settings with partial-merge updates
// =============================================================================
//
// Every tunable of the indicator engine and the signal generator lives here.
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash. All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
//
// Updates are partial: callers send an `EngineConfigUpdate` with only the
// fields they want to change and the rest keep their current values.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::RiskTolerance;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_model() -> String {
    "weighted-ensemble".to_string()
}

fn default_lookback() -> usize {
    100
}

fn default_prediction_horizon() -> u32 {
    10
}

fn default_max_position_size() -> f64 {
    100.0
}

fn default_stop_loss_pct() -> f64 {
    2.0
}

fn default_take_profit_pct() -> f64 {
    5.0
}

// =============================================================================
// EngineConfig
// =============================================================================

/// Engine settings read by the indicator engine and the signal generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Tag of the decision model in use (informational).
    #[serde(default = "default_model")]
    pub model: String,

    /// Retention window of the rolling price history.
    #[serde(default = "default_lookback")]
    pub lookback: usize,

    /// Look-ahead horizon, in poll intervals, for forward projections.
    #[serde(default = "default_prediction_horizon")]
    pub prediction_horizon: u32,

    /// Risk appetite label.
    #[serde(default)]
    pub risk_tolerance: RiskTolerance,

    /// Size of a full-confidence position, in quote units.
    #[serde(default = "default_max_position_size")]
    pub max_position_size: f64,

    /// Stop-loss distance as a percentage of entry price.
    #[serde(default = "default_stop_loss_pct")]
    pub stop_loss_pct: f64,

    /// Take-profit distance as a percentage of entry price.
    #[serde(default = "default_take_profit_pct")]
    pub take_profit_pct: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            lookback: default_lookback(),
            prediction_horizon: default_prediction_horizon(),
            risk_tolerance: RiskTolerance::default(),
            max_position_size: default_max_position_size(),
            stop_loss_pct: default_stop_loss_pct(),
            take_profit_pct: default_take_profit_pct(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing or unparseable file is an error so the caller can fall back
    /// to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read engine config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse engine config from {}", path.display()))?;

        info!(
            path = %path.display(),
            model = %config.model,
            lookback = config.lookback,
            "engine config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration using an atomic write (tmp file,
    /// then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content =
            serde_json::to_string_pretty(self).context("failed to serialise engine config")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "engine config saved (atomic)");
        Ok(())
    }

    /// Merge a partial update into this config. Unset fields keep their
    /// current values.
    pub fn apply(&mut self, update: EngineConfigUpdate) {
        if let Some(model) = update.model {
            self.model = model;
        }
        if let Some(lookback) = update.lookback {
            self.lookback = lookback;
        }
        if let Some(horizon) = update.prediction_horizon {
            self.prediction_horizon = horizon;
        }
        if let Some(risk) = update.risk_tolerance {
            self.risk_tolerance = risk;
        }
        if let Some(size) = update.max_position_size {
            self.max_position_size = size;
        }
        if let Some(sl) = update.stop_loss_pct {
            self.stop_loss_pct = sl;
        }
        if let Some(tp) = update.take_profit_pct {
            self.take_profit_pct = tp;
        }
    }
}

/// Partial update for [`EngineConfig`]; every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfigUpdate {
    pub model: Option<String>,
    pub lookback: Option<usize>,
    pub prediction_horizon: Option<u32>,
    pub risk_tolerance: Option<RiskTolerance>,
    pub max_position_size: Option<f64>,
    pub stop_loss_pct: Option<f64>,
    pub take_profit_pct: Option<f64>,
}
