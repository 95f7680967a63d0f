use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request for a route benchmark: the doctor is the start point, users are
/// the stops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkRequest {
    pub doctor_id: String,
    pub user_ids: Vec<String>,
}

/// Timings and route returned by the backend.
///
/// The backend has used two spellings for some fields; both are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkResult {
    /// Average Floyd-Warshall time in seconds.
    #[serde(alias = "fwTime")]
    pub floyd_warshall_time: f64,
    /// Average all-pairs Dijkstra time in seconds.
    pub dijkstra_time: f64,
    /// Average all-pairs Bellman-Ford time in seconds.
    pub bellman_ford_time: f64,
    /// Visit order over waypoint indices (0 is the doctor).
    #[serde(default)]
    pub tsp_route_order: Vec<usize>,
    /// Opaque route geometry, passed through for display.
    #[serde(default, alias = "routeGeoJSON", skip_serializing_if = "Option::is_none")]
    pub route_geometry: Option<Value>,
}

impl BenchmarkResult {
    /// Per-algorithm timings in display order.
    pub fn timings(&self) -> AlgorithmTimings {
        AlgorithmTimings {
            entries: vec![
                ("floydWarshall".to_string(), self.floyd_warshall_time),
                ("dijkstra".to_string(), self.dijkstra_time),
                ("bellmanFord".to_string(), self.bellman_ford_time),
            ],
        }
    }
}

/// Named timings in seconds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlgorithmTimings {
    pub entries: Vec<(String, f64)>,
}

/// One bar of the timing chart.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingBar {
    pub label: String,
    pub seconds: f64,
    /// Height relative to the chart, in `0.0..=1.0`.
    pub height: f64,
    /// Tooltip text, e.g. `0.012s`.
    pub title: String,
}

impl AlgorithmTimings {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bars normalized to the largest timing, or to one second if every
    /// timing is shorter.
    pub fn bars(&self) -> Vec<TimingBar> {
        let max = self
            .entries
            .iter()
            .map(|(_, v)| *v)
            .fold(1.0_f64, f64::max);
        self.entries
            .iter()
            .map(|(label, seconds)| TimingBar {
                label: label.clone(),
                seconds: *seconds,
                height: seconds / max,
                title: format!("{:.3}s", seconds),
            })
            .collect()
    }
}
