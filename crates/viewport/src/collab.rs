//! Seams to the collaborators the engine drives but does not own: audio
//! playback, slice persistence and the two waveform surfaces.

use serde::{Deserialize, Serialize};
use timeline::{NewSlice, Slice, SlicePatch};

pub trait PlaybackEngine {
    fn play(&mut self);
    fn pause(&mut self);
    fn seek_to(&mut self, time: f64);
    fn current_time(&self) -> f64;
    fn is_playing(&self) -> bool;
}

/// Storage for committed slices. Errors are surfaced to the caller as-is;
/// the engine never retries.
pub trait SlicePersistence {
    type Error: std::error::Error + Send + Sync + 'static;

    fn create_slice(&mut self, slice: &NewSlice) -> Result<Slice, Self::Error>;
    fn delete_slice(&mut self, id: &str) -> Result<(), Self::Error>;
    fn update_slice(&mut self, id: &str, patch: &SlicePatch) -> Result<Slice, Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayKind {
    ViewportWindow,
    PlaybackIndicator,
    PendingRegion,
    SliceMarker,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayRegion {
    pub id: String,
    pub start: f64,
    pub end: f64,
    pub kind: OverlayKind,
}

/// A rendered waveform. The engine only hands it numbers; drawing is the
/// surface's business.
pub trait WaveformSurface {
    fn render_at(&mut self, px_per_sec: f64, scroll_offset_px: f64);
    fn add_overlay_region(&mut self, overlay: &OverlayRegion);
    fn update_overlay_region(&mut self, overlay: &OverlayRegion);
    fn remove_overlay_region(&mut self, id: &str);
}
