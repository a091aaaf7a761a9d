//! Timeline data model for the sample slicer: track length and playhead,
//! the viewport window, regions and slices, and engine tuning.

mod config;
mod error;
mod region;
mod window;

pub use config::EngineConfig;
pub use error::TimelineError;
pub use region::{NewSlice, Region, Slice, SlicePatch};
pub use window::{clamp_span, finite_or, Anchor, Timeline, ViewportWindow};
