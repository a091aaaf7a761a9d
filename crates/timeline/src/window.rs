//! Timeline length/playhead and the visible viewport window.
//!
//! Everything here sanitizes instead of failing: drag gestures routinely
//! produce NaN, inverted or out-of-range intermediate values and those must
//! self-correct at the boundary between raw input and stored state.

use serde::{Deserialize, Serialize};

use crate::TimelineError;

/// Smallest window width used when a caller passes a non-positive minimum.
const MIN_WINDOW_FLOOR: f64 = 1e-6;

/// Replace NaN and infinities with `fallback`.
pub fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

/// Order a raw `[start, end]` pair and clamp both ends into `[0, duration]`.
/// May return a zero-width span; callers decide whether that is acceptable.
pub fn clamp_span(start: f64, end: f64, duration: f64) -> (f64, f64) {
    let duration = finite_or(duration, 0.0).max(0.0);
    let mut s = finite_or(start, 0.0);
    let mut e = finite_or(end, s);
    if s > e {
        std::mem::swap(&mut s, &mut e);
    }
    (s.clamp(0.0, duration), e.clamp(0.0, duration))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    duration: f64,
    current_time: f64,
}

impl Timeline {
    /// Negative or non-finite durations collapse to 0 (not loaded).
    pub fn new(duration: f64) -> Self {
        Self { duration: finite_or(duration, 0.0).max(0.0), current_time: 0.0 }
    }

    /// Like [`Timeline::new`] but refuses timelines with nothing to show.
    pub fn loaded(duration: f64) -> Result<Self, TimelineError> {
        let timeline = Self::new(duration);
        if timeline.is_loaded() { Ok(timeline) } else { Err(TimelineError::ZeroDuration(duration)) }
    }

    pub fn duration(&self) -> f64 { self.duration }

    pub fn current_time(&self) -> f64 { self.current_time }

    pub fn is_loaded(&self) -> bool { self.duration > 0.0 }

    pub fn clamp_time(&self, time: f64) -> f64 {
        finite_or(time, 0.0).clamp(0.0, self.duration)
    }

    /// Record a playhead position reported by the playback engine.
    pub fn set_current_time(&mut self, time: f64) -> f64 {
        self.current_time = self.clamp_time(time);
        self.current_time
    }
}

/// Which edge survives when a window has to grow back to the minimum width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    Start,
    End,
}

/// Time range shown by the detail surface.
///
/// Built only through [`ViewportWindow::clamped`] / [`ViewportWindow::full`],
/// so for a loaded timeline `0 <= start < end <= duration` and
/// `end - start >= min(min_window, duration)` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportWindow {
    start: f64,
    end: f64,
}

impl ViewportWindow {
    pub fn full(duration: f64) -> Self {
        Self { start: 0.0, end: finite_or(duration, 0.0).max(0.0) }
    }

    pub fn clamped(start: f64, end: f64, duration: f64, min_window: f64, anchor: Anchor) -> Self {
        let duration = finite_or(duration, 0.0).max(0.0);
        let min_w = finite_or(min_window, 0.0).max(MIN_WINDOW_FLOOR).min(duration);
        let (mut s, mut e) = clamp_span(start, end, duration);
        if e - s < min_w {
            match anchor {
                Anchor::Start => {
                    e = s + min_w;
                    if e > duration {
                        e = duration;
                        s = duration - min_w;
                    }
                }
                Anchor::End => {
                    s = e - min_w;
                    if s < 0.0 {
                        s = 0.0;
                        e = min_w;
                    }
                }
            }
        }
        Self { start: s.max(0.0), end: e.min(duration) }
    }

    pub fn start(&self) -> f64 { self.start }

    pub fn end(&self) -> f64 { self.end }

    pub fn width(&self) -> f64 { self.end - self.start }

    pub fn center(&self) -> f64 { (self.start + self.end) * 0.5 }

    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }

    /// Same width, centered on `time`, slid back inside `[0, duration]`
    /// instead of shrinking when it would overhang either end.
    pub fn recentered(&self, time: f64, duration: f64) -> Self {
        let duration = finite_or(duration, 0.0).max(0.0);
        let width = self.width().min(duration);
        let time = finite_or(time, self.center()).clamp(0.0, duration);
        let mut start = time - width * 0.5;
        if start + width > duration {
            start = duration - width;
        }
        let start = start.max(0.0);
        Self { start, end: (start + width).min(duration) }
    }
}
