//! Error types

mod api;
mod dashboard;

pub use api::*;
pub use dashboard::*;
