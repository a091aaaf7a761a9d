//! Synchronized overview/detail viewport engine.
//!
//! Gestures on the overview (minimap) move or resize a [`ViewportWindow`];
//! the [`Synchronizer`] turns them into zoom and scroll for the detail
//! surface. The detail surface hosts a single pending region that is either
//! committed as a slice through a [`SlicePersistence`] or cancelled.
//! Playback ticks only move the overview indicator.
//!
//! [`ViewportWindow`]: timeline::ViewportWindow

mod collab;
mod detail;
mod engine;
mod error;
mod event;
mod gesture;
mod lifecycle;
mod overview;
mod playback;
mod present;
mod sync;

pub use collab::{OverlayKind, OverlayRegion, PlaybackEngine, SlicePersistence, WaveformSurface};
pub use detail::{zoom_change_exceeds, DetailView};
pub use engine::{EngineSnapshot, TimelineEngine, ViewportChange};
pub use error::EngineError;
pub use event::SessionEvent;
pub use gesture::{BoundaryLock, DragClassification, GestureSession};
pub use lifecycle::{DiscardReason, RegionLifecycle, RegionOutcome};
pub use overview::OverviewGeometry;
pub use playback::{IndicatorSpan, PreviewLoop, TickAction};
pub use present::{SurfacePresenter, INDICATOR_OVERLAY_ID, VIEWPORT_OVERLAY_ID};
pub use sync::{Synchronizer, ViewportEvent, ViewportState};
