//! Fixtures shared by service tests.

use crate::actor::Actor;
use crate::stores::{MemoryStore, UserStore};
use chrono::Utc;
use ideaboard_db::entities::{profile, user};

/// Insert a user and its profile straight into the store.
pub async fn seed_user(store: &MemoryStore, username: &str) -> user::Model {
    let user = user::Model {
        id: format!("user-{username}"),
        full_name: username.to_string(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: String::new(),
        token: Some(format!("token-{username}")),
        created_at: Utc::now().into(),
        updated_at: None,
    };
    let profile = profile::Model {
        id: format!("profile-{username}"),
        profile_id: format!("p-{username}"),
        user_id: user.id.clone(),
        username: username.to_string(),
        full_name: Some(username.to_string()),
        bio: None,
        country: None,
        city: None,
        verified: false,
        slug: format!("{username}-0000"),
        created_at: Utc::now().into(),
    };

    let (user, _) = store
        .create_with_profile(user, profile)
        .await
        .unwrap_or_else(|e| panic!("seeding {username} failed: {e}"));
    user
}

/// Seed a user and return it as a signed-in actor.
pub async fn seed_actor(store: &MemoryStore, username: &str) -> Actor {
    Actor::User(seed_user(store, username).await)
}
