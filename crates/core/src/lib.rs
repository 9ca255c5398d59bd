//! Core business logic for ideaboard.

pub mod actor;
pub mod services;
pub mod stores;

pub use actor::Actor;
pub use services::*;
