//! API endpoints.

mod auth;
mod following;
mod ideas;
mod notifications;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(users::router())
        .nest("/following", following::router())
        .nest("/ideas", ideas::router())
        .nest("/notifications", notifications::router())
}
