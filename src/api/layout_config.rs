use serde::{Deserialize, Serialize};

use crate::core::{BarMode, BarNorm};
use crate::error::{LayoutError, LayoutResult};

/// Layout switches shared by every bar trace of a chart.
///
/// This type is serializable so hosts can load layout setup alongside their
/// trace fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarLayoutConfig {
    #[serde(default)]
    pub mode: BarMode,
    #[serde(default)]
    pub norm: BarNorm,
    /// Fraction of the slot unit left empty between neighboring positions.
    #[serde(default = "default_gap")]
    pub gap: f64,
    /// Fraction of each bar slot left empty between bars of one group.
    #[serde(default)]
    pub group_gap: f64,
}

impl Default for BarLayoutConfig {
    fn default() -> Self {
        Self {
            mode: BarMode::default(),
            norm: BarNorm::default(),
            gap: default_gap(),
            group_gap: 0.0,
        }
    }
}

impl BarLayoutConfig {
    #[must_use]
    pub fn new(mode: BarMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_norm(mut self, norm: BarNorm) -> Self {
        self.norm = norm;
        self
    }

    #[must_use]
    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    #[must_use]
    pub fn with_group_gap(mut self, group_gap: f64) -> Self {
        self.group_gap = group_gap;
        self
    }

    pub fn validate(self) -> LayoutResult<Self> {
        if !self.gap.is_finite() || !(0.0..=1.0).contains(&self.gap) {
            return Err(LayoutError::InvalidConfig(
                "bar gap must be finite and within [0, 1]".to_owned(),
            ));
        }
        if !self.group_gap.is_finite() || !(0.0..=1.0).contains(&self.group_gap) {
            return Err(LayoutError::InvalidConfig(
                "bar group gap must be finite and within [0, 1]".to_owned(),
            ));
        }
        Ok(self)
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(self) -> LayoutResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| LayoutError::InvalidConfig(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON and validates it.
    pub fn from_json_str(input: &str) -> LayoutResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| LayoutError::InvalidConfig(format!("failed to parse config: {e}")))?;
        config.validate()
    }
}

fn default_gap() -> f64 {
    0.2
}
