//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use ideaboard_core::{
    AccountService, FollowGraphService, IdeaService, NotificationService, ProfileService,
    stores::{
        IdeaStore, NotificationStore, ProfileStore, RequestStore, SharedTokenGenerator, UserStore,
    },
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub profile_service: ProfileService,
    pub follow_graph_service: FollowGraphService,
    pub idea_service: IdeaService,
    pub notification_service: NotificationService,
}

impl AppState {
    /// Wire every service to one store implementing all the contracts.
    ///
    /// The follow graph notifies request targets and accepted requesters.
    pub fn from_store<S>(store: Arc<S>, tokens: SharedTokenGenerator) -> Self
    where
        S: UserStore + ProfileStore + RequestStore + IdeaStore + NotificationStore + 'static,
    {
        let notification_service = NotificationService::new(store.clone(), tokens.clone());

        let mut follow_graph_service = FollowGraphService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            tokens.clone(),
        );
        follow_graph_service.set_notifications(notification_service.clone());

        Self {
            account_service: AccountService::new(store.clone(), tokens.clone()),
            profile_service: ProfileService::new(store.clone()),
            follow_graph_service,
            idea_service: IdeaService::new(store, tokens),
            notification_service,
        }
    }
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer <token>` to its user. Requests without a
/// valid token continue anonymously.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get(header::AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.account_service.authenticate_by_token(token).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid bearer token");
            }
        }
    }

    next.run(req).await
}
