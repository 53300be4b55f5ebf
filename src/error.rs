/// Error types shared by the catalog, the gateway and the layout session
use thiserror::Error;

/// Everything that can go wrong outside the pure arrangement functions
///
/// Arrangement actions never fail: an action whose preconditions do not hold
/// is a no-op. Errors only come from persistence and from session misuse.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// SQLite catalog failure
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Photograph or layout JSON could not be encoded/decoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking database task panicked or was cancelled
    #[error("background task failed: {0}")]
    Task(String),

    /// The backing service could not be reached or refused the request
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The layout referenced a photograph the catalog does not know
    #[error("unknown photograph: {0}")]
    UnknownPhotograph(String),

    /// `save()` was called while a previous save is still in flight
    #[error("a save is already in progress")]
    SaveInProgress,

    /// The session has not finished loading yet
    #[error("photographs are still loading")]
    NotReady,

    #[error("could not determine the user data directory")]
    NoDataDir,
}

impl From<tokio::task::JoinError> for LayoutError {
    fn from(err: tokio::task::JoinError) -> Self {
        LayoutError::Task(err.to_string())
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, LayoutError>;
