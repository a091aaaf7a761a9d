use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimelineError {
    /// Audio has no usable length yet (still loading, or decoding reported 0/NaN).
    #[error("timeline has no playable duration ({0})")]
    ZeroDuration(f64),

    #[error("invalid config field `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("failed to parse config: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
