use std::path::Path;

use crate::error::RelabelError;

/// Tuning for the relabeling pipeline.
///
/// Every field has a default matching the field-tuned behavior, so a partial
/// JSON object only overrides what it names.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RelabelConfig {
    /// Fraction of the distance to a newly accepted member by which the
    /// running comparison value moves during a clustering sweep.
    ///
    /// `1.0` tracks the latest member exactly; smaller values average over
    /// the sweep. Must lie in `(0, 1]`.
    pub drift_gain: f64,
    /// Multiplier applied to the final comparison value before flooring it
    /// into a cluster sort key.
    pub sort_key_scale: f64,
    /// Upper bound (exclusive) on `|b| - |a|` for an adjacent pair to count
    /// towards a reading-order rank.
    pub rank_max_abs_step: i32,
    /// Number of classifier alternates kept per button; longer lists are
    /// truncated.
    pub max_candidates: usize,
    /// Drop a short first row before building columns for column-major
    /// reading orders.
    pub suppress_partial_first_row: bool,
}

impl Default for RelabelConfig {
    fn default() -> Self {
        Self {
            drift_gain: 1.0,
            sort_key_scale: 10.0,
            rank_max_abs_step: 3,
            max_candidates: 3,
            suppress_partial_first_row: true,
        }
    }
}

impl RelabelConfig {
    /// Check value ranges.
    pub fn validate(&self) -> Result<(), RelabelError> {
        if !(self.drift_gain > 0.0 && self.drift_gain <= 1.0) {
            return Err(RelabelError::InvalidConfig(format!(
                "drift_gain must be in (0, 1], got {}",
                self.drift_gain
            )));
        }
        if !(self.sort_key_scale.is_finite() && self.sort_key_scale > 0.0) {
            return Err(RelabelError::InvalidConfig(format!(
                "sort_key_scale must be positive and finite, got {}",
                self.sort_key_scale
            )));
        }
        if self.rank_max_abs_step < 1 {
            return Err(RelabelError::InvalidConfig(format!(
                "rank_max_abs_step must be at least 1, got {}",
                self.rank_max_abs_step
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(data: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }
}
