//! Overview -> detail synchronization.
//!
//! [`Synchronizer::reduce`] is a pure `(state, event) -> state` function:
//! replaying a recorded event stream through it reproduces the exact same
//! windows, zooms and scroll offsets. Data only flows one way, from the
//! overview's viewport window into the detail view; nothing on the detail
//! side can write the window.

use serde::{Deserialize, Serialize};
use timeline::{finite_or, Anchor, EngineConfig, ViewportWindow};

use crate::detail::DetailView;
use crate::gesture::{DragClassification, GestureSession};
use crate::overview::OverviewGeometry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub window: ViewportWindow,
    pub detail: DetailView,
    /// Open while a pointer gesture on the overview is in progress.
    pub gesture: Option<GestureSession>,
}

impl ViewportState {
    pub fn classification(&self) -> DragClassification {
        self.gesture.as_ref().map(GestureSession::classification).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewportEvent {
    GestureStarted,
    /// Incremental window update from the overview, fired on every move.
    WindowChanged { start: f64, end: f64 },
    GestureEnded,
    /// Click on the overview, as a fraction of its width.
    SurfaceClicked { relative_x: f64 },
    SetWindow { start: f64, end: f64 },
    DetailResized { width_px: f64 },
}

/// Fixed parameters of one open timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Synchronizer {
    duration: f64,
    min_window: f64,
    noise_threshold: f64,
    edge_epsilon: f64,
    zoom_change_threshold: f64,
}

impl Synchronizer {
    pub fn new(duration: f64, config: &EngineConfig) -> Self {
        Self {
            duration: finite_or(duration, 0.0).max(0.0),
            min_window: config.min_window,
            noise_threshold: config.noise_threshold,
            edge_epsilon: config.edge_epsilon,
            zoom_change_threshold: config.zoom_change_threshold,
        }
    }

    pub fn duration(&self) -> f64 { self.duration }

    /// Full-duration window, detail zoomed to fit it.
    pub fn initial_state(&self, detail_width_px: f64) -> ViewportState {
        let window = ViewportWindow::full(self.duration);
        let mut detail = DetailView::new(detail_width_px);
        detail.follow(window, None);
        ViewportState { window, detail, gesture: None }
    }

    pub fn reduce(&self, state: ViewportState, event: &ViewportEvent) -> ViewportState {
        match *event {
            ViewportEvent::GestureStarted => self.gesture_started(state),
            ViewportEvent::WindowChanged { start, end } => self.window_changed(state, start, end),
            ViewportEvent::GestureEnded => self.gesture_ended(state),
            ViewportEvent::SurfaceClicked { relative_x } => self.surface_clicked(state, relative_x),
            ViewportEvent::SetWindow { start, end } => {
                let window = self.clamp(start, end, Anchor::Start);
                self.settle(state, window)
            }
            ViewportEvent::DetailResized { width_px } => {
                let mut state = state;
                state.detail.set_width(width_px);
                state.detail.follow(state.window, None);
                state
            }
        }
    }

    fn clamp(&self, start: f64, end: f64, anchor: Anchor) -> ViewportWindow {
        ViewportWindow::clamped(start, end, self.duration, self.min_window, anchor)
    }

    fn gesture_started(&self, mut state: ViewportState) -> ViewportState {
        if state.gesture.is_some() {
            tracing::debug!("viewport gesture restarted without an end");
        }
        state.gesture = Some(GestureSession::begin(state.window));
        state
    }

    fn window_changed(&self, mut state: ViewportState, start: f64, end: f64) -> ViewportState {
        // Updates outside a gesture are one-shot: classified and locked on
        // their own, then forgotten.
        let one_shot = state.gesture.is_none();
        let mut session = state.gesture.take().unwrap_or_else(|| GestureSession::begin(state.window));
        let prev = state.window;

        let class = session.classify(prev, start, end, self.noise_threshold);
        let (start, end, anchor) = match class {
            DragClassification::Pan => {
                let (s, e) = session.lock_pan_edges(prev, start, end, self.duration, self.edge_epsilon);
                let anchor = if session.lock().locked_end.is_some() && session.lock().locked_start.is_none() {
                    Anchor::End
                } else {
                    Anchor::Start
                };
                (s, e, anchor)
            }
            // A resized edge dragged across the other one stops a minimum
            // window short of it instead of swapping.
            DragClassification::ResizeLeft => (start.min(end - self.min_window), end, Anchor::End),
            DragClassification::ResizeRight => (start, end.max(start + self.min_window), Anchor::Start),
            DragClassification::Undetermined => (start, end, Anchor::Start),
        };

        state.window = self.clamp(start, end, anchor);
        let zoomed = state.detail.follow(state.window, Some(self.zoom_change_threshold));
        session.record_update();
        tracing::trace!(
            ?class,
            start = state.window.start(),
            end = state.window.end(),
            zoomed,
            "viewport window updated"
        );

        if !one_shot {
            state.gesture = Some(session);
        }
        state
    }

    fn gesture_ended(&self, mut state: ViewportState) -> ViewportState {
        if let Some(session) = state.gesture.take() {
            tracing::debug!(
                class = ?session.classification(),
                updates = session.updates(),
                from_start = session.origin().start(),
                from_end = session.origin().end(),
                start = state.window.start(),
                end = state.window.end(),
                "viewport gesture ended"
            );
        }
        state.detail.follow(state.window, None);
        state
    }

    fn surface_clicked(&self, mut state: ViewportState, relative_x: f64) -> ViewportState {
        state.gesture = None;
        let time = OverviewGeometry::new(1.0, self.duration).time_at(relative_x);
        if state.window.contains(time) {
            return state;
        }
        let window = state.window.recentered(time, self.duration);
        tracing::debug!(time, start = window.start(), end = window.end(), "click-to-pan");
        self.settle(state, window)
    }

    /// Commit a window outside any gesture, zooming exactly.
    fn settle(&self, mut state: ViewportState, window: ViewportWindow) -> ViewportState {
        state.gesture = None;
        state.window = window;
        state.detail.follow(window, None);
        state
    }
}
