use serde::{Deserialize, Serialize};
use timeline::finite_or;

/// Pixel geometry of the always-full-duration overview (minimap).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverviewGeometry {
    pub width_px: f64,
    pub duration: f64,
}

impl OverviewGeometry {
    pub fn new(width_px: f64, duration: f64) -> Self {
        Self { width_px: finite_or(width_px, 1.0).max(1.0), duration: finite_or(duration, 0.0).max(0.0) }
    }

    pub fn px_per_sec(&self) -> f64 {
        if self.duration > 0.0 { self.width_px / self.duration } else { 0.0 }
    }

    /// Map a click position given as a fraction of the overview width.
    pub fn time_at(&self, relative_x: f64) -> f64 {
        finite_or(relative_x, 0.0).clamp(0.0, 1.0) * self.duration
    }

    /// Seconds covered by `indicator_px` pixels, but never less than
    /// `min_width` so the playhead stays visible on very short tracks.
    pub fn indicator_width(&self, indicator_px: f64, min_width: f64) -> f64 {
        (self.duration * (indicator_px / self.width_px)).max(min_width).min(self.duration)
    }
}
