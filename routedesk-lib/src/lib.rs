//! Visit-planning dashboard library
//!
//! Domain models for doctors, users and route benchmarks, the API the
//! dashboard talks to, and the [`Dashboard`](dashboard::Dashboard) controller
//! that owns canonical state and wires the widgets from `routedesk-widgets`
//! together.

pub mod api;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod resource;
