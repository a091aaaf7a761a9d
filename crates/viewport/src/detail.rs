use serde::{Deserialize, Serialize};
use timeline::{finite_or, ViewportWindow};

/// Zoom and scroll parameters handed to the detail surface's `render_at`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetailView {
    pub width_px: f64,
    pub px_per_sec: f64,
    pub scroll_offset_px: f64,
}

impl DetailView {
    /// Not zoomed yet; the first [`DetailView::follow`] always applies.
    pub fn new(width_px: f64) -> Self {
        Self { width_px: sanitize_width(width_px), px_per_sec: 0.0, scroll_offset_px: 0.0 }
    }

    pub fn target_zoom(&self, window: ViewportWindow) -> f64 {
        let span = window.width();
        if span > 0.0 { self.width_px / span } else { self.px_per_sec }
    }

    pub fn visible_start(&self) -> f64 {
        if self.px_per_sec > 0.0 { self.scroll_offset_px / self.px_per_sec } else { 0.0 }
    }

    pub fn set_width(&mut self, width_px: f64) {
        self.width_px = sanitize_width(width_px);
    }

    /// Point the detail surface at `window`.
    ///
    /// With `threshold` set, the zoom only moves when it changes by more
    /// than that fraction of the current zoom; `None` applies it exactly.
    /// The scroll offset always puts `window.start()` at the left edge.
    /// Returns whether the zoom changed.
    pub fn follow(&mut self, window: ViewportWindow, threshold: Option<f64>) -> bool {
        let target = self.target_zoom(window);
        let apply = match threshold {
            Some(threshold) => zoom_change_exceeds(self.px_per_sec, target, threshold),
            None => target != self.px_per_sec,
        };
        if apply && target.is_finite() && target > 0.0 {
            tracing::trace!(from = self.px_per_sec, to = target, "detail zoom applied");
            self.px_per_sec = target;
        }
        self.scroll_offset_px = window.start() * self.px_per_sec;
        apply
    }
}

fn sanitize_width(width_px: f64) -> f64 {
    finite_or(width_px, 1.0).max(1.0)
}

/// `|target - current| / current > threshold`; an unset zoom always changes.
pub fn zoom_change_exceeds(current: f64, target: f64, threshold: f64) -> bool {
    if !(current.is_finite() && current > 0.0) {
        return true;
    }
    ((target - current) / current).abs() > threshold
}
