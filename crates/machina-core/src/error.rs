pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A direction vector was requested from two coincident points. Call
    /// sites must guard against coincidence before deriving directions; this
    /// is a programming error, not a recoverable condition.
    #[error("degenerate geometry while {context}: the points coincide")]
    DegenerateGeometry { context: &'static str },

    #[error("persisted diagram is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
