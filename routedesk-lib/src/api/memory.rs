use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::DashboardApi;
use crate::error::ApiError;
use crate::model::{BenchmarkRequest, BenchmarkResult, Doctor, User};

/// Backend data served by [`MemoryApi`].
///
/// ```json
/// {
///   "doctors": [{"_id": "d1", "name": "...", "email": "...", "latitude": 0, "longitude": 0}],
///   "users": [{"_id": "u1", "name": "...", "email": "...", "latitude": 0, "longitude": 0}],
///   "benchmark": {"fwTime": 0.01, "dijkstraTime": 0.02, "bellmanFordTime": 0.05}
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub doctors: Vec<Doctor>,
    #[serde(default)]
    pub users: Vec<User>,
    /// Result returned for every valid benchmark request.
    #[serde(default)]
    pub benchmark: Option<BenchmarkResult>,
}

/// In-memory backend.
#[derive(Debug, Default)]
pub struct MemoryApi {
    fixture: Fixture,
    requests: Mutex<Vec<BenchmarkRequest>>,
}

impl MemoryApi {
    pub fn new(fixture: Fixture) -> Self {
        Self {
            fixture,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Parse a fixture from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ApiError> {
        let fixture: Fixture = serde_json::from_str(json)
            .map_err(|e| ApiError::parse_with_body(e.to_string(), json))?;
        Ok(Self::new(fixture))
    }

    /// Read and parse a fixture file.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ApiError::transport(format!("{}: {}", path.display(), e)))?;
        log::debug!("Loaded fixture {} ({} bytes)", path.display(), json.len());
        Self::from_json(&json)
    }

    pub fn fixture(&self) -> &Fixture {
        &self.fixture
    }

    /// Benchmark requests received so far.
    pub fn requests(&self) -> Vec<BenchmarkRequest> {
        self.requests
            .lock()
            .map(|g| g.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DashboardApi for MemoryApi {
    async fn list_doctors(&self) -> Result<Vec<Doctor>, ApiError> {
        Ok(self.fixture.doctors.clone())
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.fixture.users.clone())
    }

    async fn run_benchmark(&self, request: &BenchmarkRequest) -> Result<BenchmarkResult, ApiError> {
        if let Ok(mut guard) = self.requests.lock() {
            guard.push(request.clone());
        }

        if !self.fixture.doctors.iter().any(|d| d.id == request.doctor_id) {
            return Err(ApiError::not_found("Doctor not found"));
        }
        let all_known = request
            .user_ids
            .iter()
            .all(|id| self.fixture.users.iter().any(|u| &u.id == id));
        if !all_known {
            return Err(ApiError::not_found("One or more users not found"));
        }

        self.fixture
            .benchmark
            .clone()
            .ok_or_else(|| ApiError::http(503, "Benchmark service unavailable"))
    }
}
