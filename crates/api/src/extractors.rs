//! Request extractors.
//!
//! The auth middleware stores the authenticated [`user::Model`] in the
//! request extensions. These extractors read it back.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use ideaboard_common::AppError;
use ideaboard_core::Actor;
use ideaboard_db::entities::user;

/// Authenticated user extractor. Rejects anonymous requests.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// The actor behind the request, anonymous when no valid token was sent.
///
/// Services decide whether an anonymous actor is acceptable.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<user::Model>().cloned().into()))
    }
}
