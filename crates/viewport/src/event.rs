use serde::{Deserialize, Serialize};
use timeline::Slice;

/// One recorded input to a [`TimelineEngine`](crate::TimelineEngine).
///
/// A session is a JSON-lines stream of these, one object per line, tagged
/// by `"type"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Load { duration: f64 },
    LoadSlices { slices: Vec<Slice> },

    GestureStarted,
    WindowChanged { start: f64, end: f64 },
    GestureEnded,
    SurfaceClicked { relative_x: f64 },
    SetWindow { start: f64, end: f64 },
    DetailResized { width_px: f64 },
    OverviewResized { width_px: f64 },

    RegionCreated { start: f64, end: f64 },
    /// `id` may be omitted to target whichever region is pending, since
    /// region ids are generated fresh on every run.
    RegionUpdating {
        #[serde(default)]
        id: Option<String>,
        start: f64,
        end: f64,
    },
    ConfirmRegion { name: String },
    CancelRegion,
    DoubleClick,
    Escape,
    PreviewRegion {
        #[serde(default)]
        looping: bool,
    },

    TimeUpdate { time: f64 },
    Seek { time: f64 },
}
