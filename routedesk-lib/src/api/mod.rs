//! The backend the dashboard talks to.
//!
//! [`DashboardApi`] is the seam: the HTTP wrapper lives outside this crate,
//! and [`MemoryApi`] serves a JSON fixture with the backend's lookup rules.

mod memory;
mod search;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::model::{BenchmarkRequest, BenchmarkResult, Doctor, User};

pub use memory::{Fixture, MemoryApi};
pub use search::UserSearch;

/// Dashboard backend operations.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Fetch every doctor.
    async fn list_doctors(&self) -> Result<Vec<Doctor>, ApiError>;

    /// Fetch every user.
    async fn list_users(&self) -> Result<Vec<User>, ApiError>;

    /// Run a route benchmark.
    ///
    /// Fails with a 404 when the doctor or any user does not exist.
    async fn run_benchmark(&self, request: &BenchmarkRequest) -> Result<BenchmarkResult, ApiError>;
}
