//! Load state for data the dashboard fetches.

use thiserror::Error;

/// Error type for load failures.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ResourceError {
    pub message: String,
}

impl ResourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<&crate::error::ApiError> for ResourceError {
    fn from(err: &crate::error::ApiError) -> Self {
        Self::new(err.to_string())
    }
}

/// The state of an async-loaded value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResourceState<T> {
    /// Not requested yet
    #[default]
    Idle,
    /// Request in flight
    Loading,
    /// Loaded successfully
    Ready(T),
    /// Failed to load
    Error(ResourceError),
}

impl<T> ResourceState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Get reference to ready value
    pub fn as_ready(&self) -> Option<&T> {
        match self {
            Self::Ready(v) => Some(v),
            _ => None,
        }
    }

    /// Get the error if present
    pub fn as_error(&self) -> Option<&ResourceError> {
        match self {
            Self::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Map the ready value
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ResourceState<U> {
        match self {
            Self::Idle => ResourceState::Idle,
            Self::Loading => ResourceState::Loading,
            Self::Ready(v) => ResourceState::Ready(f(v)),
            Self::Error(e) => ResourceState::Error(e),
        }
    }
}
