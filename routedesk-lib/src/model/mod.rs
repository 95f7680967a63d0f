//! Domain models and their JSON wire shapes.

mod benchmark;
mod doctor;
mod user;

pub use benchmark::*;
pub use doctor::*;
pub use user::*;
