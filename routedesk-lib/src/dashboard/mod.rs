//! The dashboard controller.
//!
//! [`Dashboard`] owns the canonical state (chosen doctor, chosen users,
//! priority flags, last benchmark result) and keeps the user table and the
//! user picker in step with it.

mod config;
mod controller;

pub use config::DashboardConfig;
pub use controller::{Dashboard, PendingBenchmark};
