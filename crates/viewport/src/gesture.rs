//! Per-gesture state for viewport window drags on the overview.
//!
//! A [`GestureSession`] lives from pointer-down to pointer-up. It memoizes
//! how the gesture was classified and which edge (if any) is frozen by a
//! boundary lock. Nothing here outlives the gesture.

use serde::{Deserialize, Serialize};
use timeline::ViewportWindow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DragClassification {
    #[default]
    Undetermined,
    Pan,
    ResizeLeft,
    ResizeRight,
}

impl DragClassification {
    /// Classify one update from how far each edge moved.
    ///
    /// Both edges moving by (nearly) the same amount is a pan. Otherwise the
    /// edge that moved more is the one being resized, as long as it moved by
    /// more than `noise`.
    pub fn from_deltas(start_delta: f64, end_delta: f64, noise: f64) -> Self {
        if !start_delta.is_finite() || !end_delta.is_finite() {
            return Self::Undetermined;
        }
        if start_delta > noise && end_delta > noise && (start_delta - end_delta).abs() < noise {
            Self::Pan
        } else if start_delta > end_delta && start_delta > noise {
            Self::ResizeLeft
        } else if end_delta > start_delta && end_delta > noise {
            Self::ResizeRight
        } else {
            Self::Undetermined
        }
    }
}

/// Edges frozen while a pan is pressed against a timeline limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundaryLock {
    pub locked_start: Option<f64>,
    pub locked_end: Option<f64>,
}

impl BoundaryLock {
    pub fn is_engaged(&self) -> bool {
        self.locked_start.is_some() || self.locked_end.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureSession {
    classification: DragClassification,
    lock: BoundaryLock,
    origin: ViewportWindow,
    updates: u32,
}

impl GestureSession {
    pub fn begin(origin: ViewportWindow) -> Self {
        Self { classification: DragClassification::Undetermined, lock: BoundaryLock::default(), origin, updates: 0 }
    }

    pub fn classification(&self) -> DragClassification { self.classification }

    pub fn lock(&self) -> BoundaryLock { self.lock }

    /// Window at the moment the gesture started.
    pub fn origin(&self) -> ViewportWindow { self.origin }

    pub fn updates(&self) -> u32 { self.updates }

    pub(crate) fn record_update(&mut self) {
        self.updates = self.updates.saturating_add(1);
    }

    /// Classify against the previous window. Once a gesture has a class it
    /// keeps it until the session ends; undetermined updates retry.
    pub fn classify(&mut self, prev: ViewportWindow, new_start: f64, new_end: f64, noise: f64) -> DragClassification {
        if self.classification == DragClassification::Undetermined {
            let start_delta = (new_start - prev.start()).abs();
            let end_delta = (new_end - prev.end()).abs();
            let class = DragClassification::from_deltas(start_delta, end_delta, noise);
            if class != DragClassification::Undetermined {
                tracing::debug!(?class, start_delta, end_delta, "viewport gesture classified");
            }
            self.classification = class;
        }
        self.classification
    }

    /// Substitute frozen edges into a pan update.
    ///
    /// Touching the left limit freezes `end` at the value the window had
    /// before that update; touching the right limit freezes `start` the same
    /// way. Each lock releases as soon as its own limit is left.
    pub fn lock_pan_edges(
        &mut self,
        prev: ViewportWindow,
        new_start: f64,
        new_end: f64,
        duration: f64,
        epsilon: f64,
    ) -> (f64, f64) {
        let hit_left = new_start <= epsilon;
        let hit_right = new_end >= duration - epsilon;

        if hit_left {
            if self.lock.locked_end.is_none() {
                tracing::debug!(locked_end = prev.end(), "pan hit left limit, freezing end");
                self.lock.locked_end = Some(prev.end());
            }
        } else if self.lock.locked_end.take().is_some() {
            tracing::debug!("pan left the left limit, end released");
        }

        if hit_right {
            if self.lock.locked_start.is_none() {
                tracing::debug!(locked_start = prev.start(), "pan hit right limit, freezing start");
                self.lock.locked_start = Some(prev.start());
            }
        } else if self.lock.locked_start.take().is_some() {
            tracing::debug!("pan left the right limit, start released");
        }

        (self.lock.locked_start.unwrap_or(new_start), self.lock.locked_end.unwrap_or(new_end))
    }
}
