//! Dashboard action errors

use super::ApiError;

/// Errors from dashboard actions.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// A benchmark needs a doctor.
    #[error("no doctor selected")]
    MissingDoctor,

    /// A benchmark needs at least one user.
    #[error("no users selected")]
    NoUsersSelected,

    /// A benchmark is already in flight.
    #[error("a benchmark is already running")]
    AlreadyRunning,

    /// The doctor ID is not in the loaded doctor list.
    #[error("unknown doctor: {0}")]
    UnknownDoctor(String),

    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}
