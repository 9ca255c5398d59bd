//! HTTP API layer for ideaboard.
//!
//! This crate exposes the services of `ideaboard-core` over JSON:
//!
//! - **Endpoints**: accounts, profiles, the follow graph, ideas and notifications
//! - **Extractors**: the acting user resolved from the bearer token
//! - **Middleware**: bearer-token authentication
//!
//! Built on Axum 0.8. Every endpoint is a `POST` taking a JSON body and
//! answering `{"data": ...}`, or `{"error": {"code", "message"}}` on failure.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
