use thiserror::Error;
use timeline::TimelineError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Timeline(#[from] TimelineError),

    #[error("no timeline loaded")]
    NotLoaded,

    #[error("slice name must not be empty")]
    EmptySliceName,

    /// The pending region is already gone from the surface at this point;
    /// it is not restored.
    #[error("failed to persist slice: {0}")]
    Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),
}
