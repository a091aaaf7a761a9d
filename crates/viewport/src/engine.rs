//! The engine a host UI talks to for one open track.
//!
//! `TimelineEngine` owns the viewport state, the pending region and the
//! preview loop, feeds overview gestures through the [`Synchronizer`] and
//! notifies listeners when the window or pending region changes.

use serde::Serialize;
use timeline::{EngineConfig, NewSlice, Region, Slice, Timeline, ViewportWindow};

use crate::collab::{PlaybackEngine, SlicePersistence};
use crate::detail::DetailView;
use crate::error::EngineError;
use crate::event::SessionEvent;
use crate::gesture::{BoundaryLock, DragClassification};
use crate::lifecycle::{DiscardReason, RegionLifecycle, RegionOutcome};
use crate::overview::OverviewGeometry;
use crate::playback::{IndicatorSpan, PreviewLoop, TickAction};
use crate::sync::{Synchronizer, ViewportEvent, ViewportState};

/// Delivered to `on_viewport_changed` listeners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportChange {
    pub window: ViewportWindow,
    pub detail: DetailView,
    pub zoom_changed: bool,
}

/// Serializable picture of everything the engine currently holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineSnapshot {
    pub duration: f64,
    pub current_time: f64,
    pub window: Option<ViewportWindow>,
    pub detail: Option<DetailView>,
    pub classification: DragClassification,
    pub boundary_lock: BoundaryLock,
    pub pending_region: Option<Region>,
    pub markers: Vec<Region>,
    pub indicator: Option<IndicatorSpan>,
    pub previewing: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
enum Preview {
    #[default]
    Idle,
    Active(PreviewLoop),
    /// The previewed region went away; pause on the next tick.
    Stopping,
}

type ViewportListener = Box<dyn FnMut(&ViewportChange)>;
type RegionListener = Box<dyn FnMut(Option<&Region>)>;

pub struct TimelineEngine {
    config: EngineConfig,
    timeline: Timeline,
    viewport: Option<ViewportState>,
    regions: RegionLifecycle,
    preview: Preview,
    indicator: Option<IndicatorSpan>,
    overview_width_px: f64,
    detail_width_px: f64,
    viewport_listeners: Vec<ViewportListener>,
    region_listeners: Vec<RegionListener>,
}

impl TimelineEngine {
    /// Rejects configs with non-finite or non-positive thresholds.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let overview_width_px = config.overview_width_px;
        let detail_width_px = config.detail_width_px;
        Ok(Self {
            config,
            timeline: Timeline::new(0.0),
            viewport: None,
            regions: RegionLifecycle::default(),
            preview: Preview::Idle,
            indicator: None,
            overview_width_px,
            detail_width_px,
            viewport_listeners: Vec::new(),
            region_listeners: Vec::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig { &self.config }

    pub fn timeline(&self) -> &Timeline { &self.timeline }

    pub fn is_loaded(&self) -> bool { self.viewport.is_some() }

    /// Open a track. A zero or unknown duration leaves the engine inert and
    /// is reported back rather than papered over.
    pub fn load(&mut self, duration: f64) -> Result<ViewportWindow, EngineError> {
        let had_pending = self.regions.pending().is_some();
        self.regions = RegionLifecycle::default();
        self.preview = Preview::Idle;
        self.indicator = None;

        let result = match Timeline::loaded(duration) {
            Ok(timeline) => {
                self.timeline = timeline;
                let state = self.synchronizer().initial_state(self.detail_width_px);
                let window = state.window;
                self.viewport = Some(state);
                self.indicator = Some(self.project_indicator());
                tracing::info!(duration, "timeline loaded");
                Ok(window)
            }
            Err(err) => {
                self.timeline = Timeline::new(0.0);
                self.viewport = None;
                tracing::warn!(duration, "refusing to initialize viewport: {err}");
                Err(err.into())
            }
        };

        if had_pending {
            self.notify_region();
        }
        if result.is_ok() {
            self.notify_viewport(true);
        }
        result
    }

    // Viewport

    pub fn viewport_window(&self) -> Option<ViewportWindow> {
        self.viewport.as_ref().map(|s| s.window)
    }

    pub fn detail_view(&self) -> Option<DetailView> {
        self.viewport.as_ref().map(|s| s.detail)
    }

    pub fn gesture_classification(&self) -> DragClassification {
        self.viewport.as_ref().map(ViewportState::classification).unwrap_or_default()
    }

    pub fn boundary_lock(&self) -> BoundaryLock {
        self.viewport
            .as_ref()
            .and_then(|s| s.gesture.as_ref())
            .map(|g| g.lock())
            .unwrap_or_default()
    }

    pub fn set_viewport_window(&mut self, start: f64, end: f64) -> Result<ViewportWindow, EngineError> {
        self.apply(ViewportEvent::SetWindow { start, end }).ok_or(EngineError::NotLoaded)
    }

    pub fn begin_window_gesture(&mut self) {
        self.apply(ViewportEvent::GestureStarted);
    }

    /// Incremental window update from the overview (drag or resize in
    /// progress). Returns the window actually committed.
    pub fn on_window_changed(&mut self, start: f64, end: f64) -> Option<ViewportWindow> {
        self.apply(ViewportEvent::WindowChanged { start, end })
    }

    pub fn end_window_gesture(&mut self) {
        self.apply(ViewportEvent::GestureEnded);
    }

    pub fn on_surface_clicked(&mut self, relative_x: f64) -> Option<ViewportWindow> {
        self.apply(ViewportEvent::SurfaceClicked { relative_x })
    }

    pub fn set_detail_width(&mut self, width_px: f64) {
        self.detail_width_px = width_px;
        self.apply(ViewportEvent::DetailResized { width_px });
    }

    pub fn overview_width_px(&self) -> f64 { self.overview_width_px }

    pub fn set_overview_width(&mut self, width_px: f64) {
        self.overview_width_px = OverviewGeometry::new(width_px, 0.0).width_px;
        if self.is_loaded() {
            self.indicator = Some(self.project_indicator());
        }
    }

    pub fn on_viewport_changed(&mut self, listener: impl FnMut(&ViewportChange) + 'static) {
        self.viewport_listeners.push(Box::new(listener));
    }

    fn synchronizer(&self) -> Synchronizer {
        Synchronizer::new(self.timeline.duration(), &self.config)
    }

    fn apply(&mut self, event: ViewportEvent) -> Option<ViewportWindow> {
        let before = self.viewport.take()?;
        let (prev_window, prev_detail) = (before.window, before.detail);
        let after = self.synchronizer().reduce(before, &event);
        let window = after.window;
        let changed = after.window != prev_window || after.detail != prev_detail;
        let zoom_changed = after.detail.px_per_sec != prev_detail.px_per_sec;
        self.viewport = Some(after);
        if changed {
            self.notify_viewport(zoom_changed);
        }
        Some(window)
    }

    fn notify_viewport(&mut self, zoom_changed: bool) {
        let Some(state) = &self.viewport else { return };
        let change = ViewportChange { window: state.window, detail: state.detail, zoom_changed };
        for listener in &mut self.viewport_listeners {
            listener(&change);
        }
    }

    // Regions

    pub fn pending_region(&self) -> Option<&Region> { self.regions.pending() }

    pub fn committed_markers(&self) -> &[Region] { self.regions.markers() }

    pub fn set_committed_slices(&mut self, slices: &[Slice]) {
        self.regions.set_markers(slices);
    }

    /// Drag released on the detail surface.
    pub fn on_region_created(&mut self, start: f64, end: f64) -> RegionOutcome {
        if !self.is_loaded() {
            return RegionOutcome::Discarded { reason: DiscardReason::NotLoaded };
        }
        let outcome = self.regions.create(start, end, self.timeline.duration(), self.config.min_region_width);
        if matches!(outcome, RegionOutcome::Created { .. }) {
            self.notify_region();
        }
        outcome
    }

    /// A handle of the pending region is being dragged. A running preview
    /// picks up the new bounds without being interrupted.
    pub fn on_region_updating(&mut self, id: &str, start: f64, end: f64) -> bool {
        let duration = self.timeline.duration();
        if !self.regions.update(id, start, end, duration, self.config.min_region_width) {
            return false;
        }
        if let (Preview::Active(preview), Some(region)) = (&mut self.preview, self.regions.pending()) {
            if preview.region_id == region.id {
                preview.retarget(region.start, region.end);
            }
        }
        self.notify_region();
        true
    }

    /// Turn the pending region into a slice.
    ///
    /// The region leaves the surface before the store is called. If the
    /// store fails the error is returned and the region stays gone.
    pub fn confirm_pending_region<S: SlicePersistence>(
        &mut self,
        name: &str,
        store: &mut S,
    ) -> Result<Option<Slice>, EngineError> {
        if self.regions.pending().is_none() {
            return Ok(None);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::EmptySliceName);
        }
        let Some(region) = self.regions.take_pending() else {
            return Ok(None);
        };
        self.stop_preview_of(&region.id);
        self.notify_region();

        let request = NewSlice::from_region(name, &region);
        match store.create_slice(&request) {
            Ok(slice) => {
                tracing::info!(id = %slice.id, name = %slice.name, start = slice.start_time, end = slice.end_time, "slice committed");
                self.regions.add_marker(&slice);
                Ok(Some(slice))
            }
            Err(err) => {
                tracing::warn!(name, "slice commit failed: {err}");
                Err(EngineError::Persistence(Box::new(err)))
            }
        }
    }

    /// Drop the pending region without persisting anything. No-op when
    /// nothing is pending.
    pub fn cancel_pending_region(&mut self) -> Option<Region> {
        let region = self.regions.take_pending()?;
        tracing::debug!(id = %region.id, "pending region cancelled");
        self.stop_preview_of(&region.id);
        self.notify_region();
        Some(region)
    }

    pub fn on_double_click(&mut self) -> Option<Region> {
        self.cancel_pending_region()
    }

    /// Escape ends whatever is in flight: an overview gesture and the
    /// pending region.
    pub fn on_escape(&mut self) -> Option<Region> {
        if self.viewport.as_ref().is_some_and(|s| s.gesture.is_some()) {
            self.end_window_gesture();
        }
        self.cancel_pending_region()
    }

    pub fn on_pending_region_changed(&mut self, listener: impl FnMut(Option<&Region>) + 'static) {
        self.region_listeners.push(Box::new(listener));
    }

    fn notify_region(&mut self) {
        let pending = self.regions.pending().cloned();
        for listener in &mut self.region_listeners {
            listener(pending.as_ref());
        }
    }

    // Playback

    pub fn playback_indicator(&self) -> Option<IndicatorSpan> { self.indicator }

    pub fn previewing(&self) -> Option<&str> {
        match &self.preview {
            Preview::Active(p) => Some(p.region_id.as_str()),
            _ => None,
        }
    }

    /// Play the pending region from its start, stopping (or looping) at its end.
    pub fn preview_pending_region<P: PlaybackEngine>(&mut self, looping: bool, playback: &mut P) -> bool {
        let Some(region) = self.regions.pending() else {
            return false;
        };
        let preview = PreviewLoop::start(region, looping, playback);
        self.timeline.set_current_time(preview.start);
        self.preview = Preview::Active(preview);
        true
    }

    /// Playback tick. Moves the overview indicator and enforces preview
    /// bounds; never touches the viewport window.
    pub fn on_time_update<P: PlaybackEngine>(&mut self, time: f64, playback: &mut P) -> Option<IndicatorSpan> {
        let now = self.timeline.set_current_time(time);
        match std::mem::take(&mut self.preview) {
            Preview::Active(preview) => {
                if preview.on_tick(now, playback) != TickAction::Stopped {
                    self.preview = Preview::Active(preview);
                }
            }
            Preview::Stopping => {
                if playback.is_playing() {
                    playback.pause();
                }
            }
            Preview::Idle => {}
        }
        if !self.is_loaded() {
            return None;
        }
        let span = self.project_indicator();
        self.indicator = Some(span);
        Some(span)
    }

    /// Clamp to the track and hand the seek to the playback engine.
    pub fn seek_to<P: PlaybackEngine>(&mut self, time: f64, playback: &mut P) -> f64 {
        let time = self.timeline.clamp_time(time);
        playback.seek_to(time);
        self.timeline.set_current_time(time);
        if self.is_loaded() {
            self.indicator = Some(self.project_indicator());
        }
        time
    }

    fn project_indicator(&self) -> IndicatorSpan {
        let duration = self.timeline.duration();
        let width = OverviewGeometry::new(self.overview_width_px, duration)
            .indicator_width(self.config.indicator_px, self.config.indicator_min_width);
        IndicatorSpan::project(self.timeline.current_time(), duration, width)
    }

    fn stop_preview_of(&mut self, region_id: &str) {
        if matches!(&self.preview, Preview::Active(p) if p.region_id == region_id) {
            self.preview = Preview::Stopping;
        }
    }

    // Replay

    /// Apply one recorded event, routing it to the matching operation.
    pub fn dispatch<S, P>(&mut self, event: &SessionEvent, store: &mut S, playback: &mut P) -> Result<(), EngineError>
    where
        S: SlicePersistence,
        P: PlaybackEngine,
    {
        match event {
            SessionEvent::Load { duration } => {
                self.load(*duration)?;
            }
            SessionEvent::LoadSlices { slices } => self.set_committed_slices(slices),
            SessionEvent::GestureStarted => self.begin_window_gesture(),
            SessionEvent::WindowChanged { start, end } => {
                self.on_window_changed(*start, *end);
            }
            SessionEvent::GestureEnded => self.end_window_gesture(),
            SessionEvent::SurfaceClicked { relative_x } => {
                self.on_surface_clicked(*relative_x);
            }
            SessionEvent::SetWindow { start, end } => {
                self.set_viewport_window(*start, *end)?;
            }
            SessionEvent::DetailResized { width_px } => self.set_detail_width(*width_px),
            SessionEvent::OverviewResized { width_px } => self.set_overview_width(*width_px),
            SessionEvent::RegionCreated { start, end } => {
                self.on_region_created(*start, *end);
            }
            SessionEvent::RegionUpdating { id, start, end } => {
                let target = id.clone().or_else(|| self.pending_region().map(|r| r.id.clone()));
                if let Some(id) = target {
                    self.on_region_updating(&id, *start, *end);
                }
            }
            SessionEvent::ConfirmRegion { name } => {
                self.confirm_pending_region(name, store)?;
            }
            SessionEvent::CancelRegion => {
                self.cancel_pending_region();
            }
            SessionEvent::DoubleClick => {
                self.on_double_click();
            }
            SessionEvent::Escape => {
                self.on_escape();
            }
            SessionEvent::PreviewRegion { looping } => {
                self.preview_pending_region(*looping, playback);
            }
            SessionEvent::TimeUpdate { time } => {
                self.on_time_update(*time, playback);
            }
            SessionEvent::Seek { time } => {
                self.seek_to(*time, playback);
            }
        }
        Ok(())
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            duration: self.timeline.duration(),
            current_time: self.timeline.current_time(),
            window: self.viewport_window(),
            detail: self.detail_view(),
            classification: self.gesture_classification(),
            boundary_lock: self.boundary_lock(),
            pending_region: self.regions.pending().cloned(),
            markers: self.regions.markers().to_vec(),
            indicator: self.indicator,
            previewing: self.previewing().map(str::to_owned),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use timeline::SlicePatch;

    use super::*;
    use crate::playback::tests::FakePlayback;

    #[derive(Debug, thiserror::Error)]
    #[error("store offline")]
    pub(crate) struct Offline;

    /// Persistence fake that records every request.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingStore {
        pub created: Vec<NewSlice>,
        pub fail: bool,
    }

    impl SlicePersistence for RecordingStore {
        type Error = Offline;

        fn create_slice(&mut self, slice: &NewSlice) -> Result<Slice, Offline> {
            self.created.push(slice.clone());
            if self.fail {
                return Err(Offline);
            }
            Ok(Slice {
                id: format!("slice-{}", self.created.len()),
                name: slice.name.clone(),
                start_time: slice.start_time,
                end_time: slice.end_time,
            })
        }

        fn delete_slice(&mut self, _id: &str) -> Result<(), Offline> {
            Ok(())
        }

        fn update_slice(&mut self, id: &str, patch: &SlicePatch) -> Result<Slice, Offline> {
            let base = Slice { id: id.into(), name: String::new(), start_time: 0.0, end_time: 0.0 };
            Ok(patch.apply_to(&base))
        }
    }

    fn engine(duration: f64, detail_width_px: f64) -> TimelineEngine {
        let config = EngineConfig { detail_width_px, ..EngineConfig::default() };
        let mut engine = TimelineEngine::new(config).unwrap();
        engine.load(duration).unwrap();
        engine
    }

    fn pending_id(engine: &TimelineEngine) -> String {
        engine.pending_region().map(|r| r.id.clone()).unwrap()
    }

    #[test]
    fn zero_duration_is_reported_and_inert() {
        let mut engine = TimelineEngine::new(EngineConfig::default()).unwrap();
        let err = engine.load(0.0).unwrap_err();
        assert!(matches!(err, EngineError::Timeline(timeline::TimelineError::ZeroDuration(_))));
        assert!(engine.viewport_window().is_none());
        assert!(engine.on_window_changed(0.0, 10.0).is_none());
        assert!(matches!(engine.set_viewport_window(0.0, 1.0), Err(EngineError::NotLoaded)));
        assert_eq!(
            engine.on_region_created(1.0, 2.0),
            RegionOutcome::Discarded { reason: DiscardReason::NotLoaded }
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EngineConfig { zoom_change_threshold: -0.01, ..EngineConfig::default() };
        let err = TimelineEngine::new(config).err().unwrap();
        assert!(matches!(
            err,
            EngineError::Timeline(timeline::TimelineError::InvalidConfig { field: "zoom_change_threshold", .. })
        ));
    }

    #[test]
    fn second_pending_region_is_discarded() {
        let mut engine = engine(30.0, 1000.0);
        engine.on_region_created(1.0, 1.5);
        let original = engine.pending_region().cloned().unwrap();
        let outcome = engine.on_region_created(5.0, 8.0);
        assert_eq!(outcome, RegionOutcome::Discarded { reason: DiscardReason::PendingExists });
        assert_eq!(engine.pending_region(), Some(&original));
    }

    #[test]
    fn confirm_issues_one_create_and_clears() {
        let mut engine = engine(30.0, 1000.0);
        let mut store = RecordingStore::default();
        engine.on_region_created(1.0, 1.5);

        let slice = engine.confirm_pending_region("kick", &mut store).unwrap().unwrap();
        assert_eq!(store.created, vec![NewSlice { name: "kick".into(), start_time: 1.0, end_time: 1.5 }]);
        assert_eq!(slice.name, "kick");
        assert!(engine.pending_region().is_none());
        assert_eq!(engine.committed_markers().len(), 1);
        assert!(engine.committed_markers()[0].committed);
    }

    #[test]
    fn cancel_without_pending_is_a_no_op() {
        let mut engine = engine(30.0, 1000.0);
        let mut store = RecordingStore::default();
        assert!(engine.cancel_pending_region().is_none());
        assert!(engine.cancel_pending_region().is_none());
        assert!(engine.confirm_pending_region("kick", &mut store).unwrap().is_none());
        assert!(store.created.is_empty());
    }

    #[test]
    fn empty_name_keeps_region_pending() {
        let mut engine = engine(30.0, 1000.0);
        let mut store = RecordingStore::default();
        engine.on_region_created(1.0, 1.5);
        assert!(matches!(engine.confirm_pending_region("  ", &mut store), Err(EngineError::EmptySliceName)));
        assert!(engine.pending_region().is_some());
        assert!(store.created.is_empty());
    }

    #[test]
    fn failed_commit_does_not_restore_region() {
        let mut engine = engine(30.0, 1000.0);
        let mut store = RecordingStore { fail: true, ..Default::default() };
        engine.on_region_created(1.0, 1.5);
        let err = engine.confirm_pending_region("kick", &mut store).unwrap_err();
        assert!(matches!(err, EngineError::Persistence(_)));
        assert_eq!(err.to_string(), "failed to persist slice: store offline");
        assert!(engine.pending_region().is_none());
        assert!(engine.committed_markers().is_empty());
    }

    #[test]
    fn region_is_removed_before_store_is_called() {
        let mut engine = engine(30.0, 1000.0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        engine.on_pending_region_changed(move |r| log.borrow_mut().push(r.map(|r| (r.start, r.end))));

        let mut store = RecordingStore { fail: true, ..Default::default() };
        engine.on_region_created(2.0, 3.0);
        let _ = engine.confirm_pending_region("hat", &mut store);
        assert_eq!(*seen.borrow(), vec![Some((2.0, 3.0)), None]);
    }

    #[test]
    fn double_click_and_escape_cancel() {
        let mut engine = engine(30.0, 1000.0);
        engine.on_region_created(1.0, 2.0);
        assert!(engine.on_double_click().is_some());
        assert!(engine.pending_region().is_none());

        engine.on_region_created(1.0, 2.0);
        engine.begin_window_gesture();
        engine.on_window_changed(0.0, 20.0);
        assert_ne!(engine.gesture_classification(), DragClassification::Undetermined);
        assert!(engine.on_escape().is_some());
        assert_eq!(engine.gesture_classification(), DragClassification::Undetermined);
        assert!(!engine.boundary_lock().is_engaged());
    }

    #[test]
    fn viewport_listener_sees_changes_only() {
        let mut engine = engine(100.0, 1000.0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        engine.on_viewport_changed(move |c| log.borrow_mut().push((c.window.start(), c.window.end(), c.zoom_changed)));

        engine.on_window_changed(0.0, 50.0);
        engine.on_window_changed(0.0, 50.0);
        engine.on_surface_clicked(0.1);
        assert_eq!(*seen.borrow(), vec![(0.0, 50.0, true)]);
    }

    #[test]
    fn playback_never_moves_the_viewport() {
        let mut engine = engine(100.0, 1000.0);
        let mut playback = FakePlayback::default();
        engine.set_viewport_window(10.0, 20.0).unwrap();
        let before = (engine.viewport_window(), engine.detail_view());
        for t in [5.0, 15.0, 25.0, 99.0, 150.0] {
            engine.on_time_update(t, &mut playback);
        }
        assert_eq!((engine.viewport_window(), engine.detail_view()), before);
        let indicator = engine.playback_indicator().unwrap();
        assert!(indicator.end <= 100.0);
        assert!(indicator.end - indicator.start >= 0.01);
    }

    #[test]
    fn preview_tracks_live_resize_and_stops() {
        let mut engine = engine(30.0, 1000.0);
        let mut playback = FakePlayback::default();
        engine.on_region_created(2.0, 3.0);
        let id = pending_id(&engine);
        assert!(engine.preview_pending_region(false, &mut playback));
        assert!(playback.playing);
        assert_eq!(playback.time, 2.0);

        assert!(engine.on_region_updating(&id, 2.0, 4.0));
        engine.on_time_update(3.5, &mut playback);
        assert!(playback.playing, "resize must not interrupt preview");

        engine.on_time_update(4.0, &mut playback);
        assert!(!playback.playing);
        assert!(engine.previewing().is_none());
    }

    #[test]
    fn cancelling_previewed_region_pauses_on_next_tick() {
        let mut engine = engine(30.0, 1000.0);
        let mut playback = FakePlayback::default();
        engine.on_region_created(2.0, 3.0);
        engine.preview_pending_region(true, &mut playback);
        engine.cancel_pending_region();
        assert!(playback.playing);
        engine.on_time_update(2.2, &mut playback);
        assert!(!playback.playing);
    }

    #[test]
    fn seek_is_clamped_and_delegated() {
        let mut engine = engine(30.0, 1000.0);
        let mut playback = FakePlayback::default();
        assert_eq!(engine.seek_to(45.0, &mut playback), 30.0);
        assert_eq!(playback.time, 30.0);
        assert_eq!(engine.timeline().current_time(), 30.0);
    }

    #[test]
    fn minimap_scenario() {
        let mut engine = engine(120.0, 1200.0);
        let mut store = RecordingStore::default();
        assert_eq!(engine.viewport_window(), Some(ViewportWindow::full(120.0)));

        engine.begin_window_gesture();
        for end in [110.0, 90.0, 75.0, 60.0] {
            engine.on_window_changed(0.0, end);
        }
        engine.end_window_gesture();
        let window = engine.viewport_window().unwrap();
        assert_eq!((window.start(), window.end()), (0.0, 60.0));
        assert!((engine.detail_view().unwrap().px_per_sec - 1200.0 / 60.0).abs() < 1e-9);

        engine.on_region_created(10.0, 12.0);
        let pending = engine.pending_region().unwrap();
        assert_eq!((pending.start, pending.end), (10.0, 12.0));

        engine.confirm_pending_region("snare", &mut store).unwrap();
        assert_eq!(store.created, vec![NewSlice { name: "snare".into(), start_time: 10.0, end_time: 12.0 }]);
        assert!(engine.pending_region().is_none());
    }

    #[test]
    fn dispatch_replays_a_session() {
        let events: Vec<SessionEvent> = [
            r#"{"type":"load","duration":120}"#,
            r#"{"type":"gesture_started"}"#,
            r#"{"type":"window_changed","start":0,"end":60}"#,
            r#"{"type":"gesture_ended"}"#,
            r#"{"type":"region_created","start":10,"end":12}"#,
            r#"{"type":"region_updating","start":10,"end":12.5}"#,
            r#"{"type":"confirm_region","name":"snare"}"#,
        ]
        .iter()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

        let mut engine = TimelineEngine::new(EngineConfig::default()).unwrap();
        let mut store = RecordingStore::default();
        let mut playback = FakePlayback::default();
        for event in &events {
            engine.dispatch(event, &mut store, &mut playback).unwrap();
        }
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.window.map(|w| w.end()), Some(60.0));
        assert!(snapshot.pending_region.is_none());
        assert_eq!(store.created[0].end_time, 12.5);
        assert_eq!(snapshot.markers.len(), 1);
    }
}
