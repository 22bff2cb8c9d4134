//! Engine configuration

use crate::probe::ProbeConfig;
use crate::scoring::ScoringRules;
use crate::stats::{BandThresholds, RiskThresholds, WeightTable};
use isms_common::{IsmsError, IsmsResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything the engine needs besides a store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Score movement under which an audit trend is stable
    pub trend_tolerance: f64,
    /// JSON file of per-control guidance
    pub guidance_path: Option<PathBuf>,
    /// Prefix CSV exports with a UTF-8 byte order mark
    pub csv_bom: bool,
    pub weights: WeightTable,
    pub bands: BandThresholds,
    pub risk: RiskThresholds,
    pub probe: ProbeConfig,
    pub scoring: ScoringRules,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trend_tolerance: 2.0,
            guidance_path: None,
            csv_bom: true,
            weights: WeightTable::default(),
            bands: BandThresholds::default(),
            risk: RiskThresholds::default(),
            probe: ProbeConfig::default(),
            scoring: ScoringRules::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> IsmsResult<()> {
        self.weights.validate()?;
        self.scoring.validate()?;
        self.probe.validate()?;

        let bands = &self.bands;
        if !(0.0..=100.0).contains(&bands.in_progress)
            || !(0.0..=100.0).contains(&bands.satisfactory)
            || bands.in_progress > bands.satisfactory
        {
            return Err(IsmsError::Config(format!(
                "band thresholds must satisfy 0 <= in_progress ({}) <= satisfactory ({}) <= 100",
                bands.in_progress, bands.satisfactory
            )));
        }
        if self.risk.elevated > self.risk.high {
            return Err(IsmsError::Config(format!(
                "risk thresholds: elevated ({}) above high ({})",
                self.risk.elevated, self.risk.high
            )));
        }
        if !self.trend_tolerance.is_finite() || self.trend_tolerance < 0.0 {
            return Err(IsmsError::Config("trend tolerance must be a non-negative number".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.bands.satisfactory, 80.0);
        assert_eq!(config.risk.high, 10);
        assert_eq!(config.probe.signal_timeout_secs, 10);
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let mut config = EngineConfig::default();
        config.bands.in_progress = 90.0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.risk.elevated = 20;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.weights.largely_conforming = 120;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.trend_tolerance = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"csv_bom": false, "probe": {"signal_timeout_secs": 3}}"#).unwrap();
        assert!(!config.csv_bom);
        assert_eq!(config.probe.signal_timeout_secs, 3);
        assert_eq!(config.weights, WeightTable::default());
        assert_eq!(config.scoring, ScoringRules::default());
    }
}
