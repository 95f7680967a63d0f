//! Remote option search.

use async_trait::async_trait;
use thiserror::Error;

use super::SelectOption;

/// Errors a search source may report.
///
/// The MultiSelect never surfaces these to its host: a failed search shows
/// as an empty result list.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// The request could not reach the remote side or it failed.
    #[error("search transport failed: {0}")]
    Transport(String),
}

impl SearchError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }
}

/// A remote source of options for a query.
///
/// Must resolve with an empty list when nothing matches and fail only on
/// transport problems.
#[async_trait]
pub trait OptionSource: Send + Sync {
    /// Search for options matching `query`.
    async fn search(&self, query: &str) -> Result<Vec<SelectOption>, SearchError>;
}
