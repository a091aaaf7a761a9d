//! Tunable thresholds for the viewport engine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::TimelineError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Narrowest viewport window, seconds.
    pub min_window: f64,
    /// Per-update deltas at or below this are treated as pointer noise (δ).
    pub noise_threshold: f64,
    /// Distance from 0 / duration that counts as touching a limit (ε).
    pub edge_epsilon: f64,
    /// Relative zoom change below which the detail surface is not re-zoomed.
    pub zoom_change_threshold: f64,
    /// Playback indicator width on the overview, in pixels.
    pub indicator_px: f64,
    /// Playback indicator width floor, seconds.
    pub indicator_min_width: f64,
    /// Drag selections narrower than this do not become regions.
    pub min_region_width: f64,
    pub overview_width_px: f64,
    pub detail_width_px: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_window: 0.5,
            noise_threshold: 0.001,
            edge_epsilon: 0.005,
            zoom_change_threshold: 0.01,
            indicator_px: 2.0,
            indicator_min_width: 0.01,
            min_region_width: 0.01,
            overview_width_px: 800.0,
            detail_width_px: 1200.0,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, TimelineError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, TimelineError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), TimelineError> {
        let fields = [
            ("min_window", self.min_window),
            ("noise_threshold", self.noise_threshold),
            ("edge_epsilon", self.edge_epsilon),
            ("zoom_change_threshold", self.zoom_change_threshold),
            ("indicator_px", self.indicator_px),
            ("indicator_min_width", self.indicator_min_width),
            ("min_region_width", self.min_region_width),
            ("overview_width_px", self.overview_width_px),
            ("detail_width_px", self.detail_width_px),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(TimelineError::InvalidConfig {
                    field,
                    reason: format!("must be a positive number, got {value}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(r#"{ "min_window": 1.0, "detail_width_px": 640 }"#).unwrap();
        assert_eq!(config.min_window, 1.0);
        assert_eq!(config.detail_width_px, 640.0);
        assert_eq!(config.edge_epsilon, 0.005);
    }

    #[test]
    fn rejects_non_positive_values() {
        let err = EngineConfig::from_json_str(r#"{ "edge_epsilon": 0 }"#).unwrap_err();
        assert!(matches!(err, TimelineError::InvalidConfig { field: "edge_epsilon", .. }));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(EngineConfig::from_json_str("{ nope"), Err(TimelineError::Config(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "zoom_change_threshold": 0.02 }}"#).unwrap();
        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.zoom_change_threshold, 0.02);
    }
}
