//! Account service: registration, sign-in and credentials.

use crate::actor::Actor;
use crate::stores::{SharedTokenGenerator, SharedUserStore};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use ideaboard_common::{AppError, AppResult};
use ideaboard_db::entities::{profile, user};
use serde::Deserialize;
use validator::Validate;

/// Input for registering a new account.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,

    #[validate(length(min = 1, max = 50))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Input for signing in.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Input for changing the actor's password.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordInput {
    pub old_password: String,

    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

/// Account service for business logic.
#[derive(Clone)]
pub struct AccountService {
    users: SharedUserStore,
    tokens: SharedTokenGenerator,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub fn new(users: SharedUserStore, tokens: SharedTokenGenerator) -> Self {
        Self { users, tokens }
    }

    /// Register a new account.
    ///
    /// The user and its profile are stored together. The returned user
    /// carries a fresh session token.
    pub async fn register(&self, input: RegisterInput) -> AppResult<(user::Model, profile::Model)> {
        input.validate()?;

        if self.users.find_by_username(&input.username).await?.is_some() {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }
        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let now = Utc::now();

        let user = user::Model {
            id: self.tokens.new_id(),
            full_name: input.full_name.clone(),
            username: input.username.clone(),
            email: input.email,
            password: password_hash,
            token: Some(self.tokens.new_session_token()),
            created_at: now.into(),
            updated_at: None,
        };

        let profile = profile::Model {
            id: self.tokens.new_id(),
            profile_id: self.tokens.new_short_token(),
            user_id: user.id.clone(),
            username: input.username.clone(),
            full_name: Some(input.full_name),
            bio: None,
            country: None,
            city: None,
            verified: false,
            slug: self.tokens.new_slug(&input.username),
            created_at: now.into(),
        };

        let (user, profile) = self.users.create_with_profile(user, profile).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "Registered account");
        Ok((user, profile))
    }

    /// Sign in with email and password, issuing a new session token.
    pub async fn login(&self, input: LoginInput) -> AppResult<user::Model> {
        input.validate()?;

        let mut user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(&input.password, &user.password)? {
            tracing::debug!(user_id = %user.id, "Rejected sign-in with wrong password");
            return Err(AppError::Unauthorized);
        }

        user.token = Some(self.tokens.new_session_token());
        let user = self.users.update(user).await?;

        tracing::info!(user_id = %user.id, "Signed in");
        Ok(user)
    }

    /// End the actor's session.
    pub async fn logout(&self, actor: &Actor) -> AppResult<()> {
        let mut user = actor.require()?.clone();
        user.token = None;
        self.users.update(user).await?;
        Ok(())
    }

    /// Change the actor's password after checking the current one.
    pub async fn change_password(&self, actor: &Actor, input: ChangePasswordInput) -> AppResult<()> {
        input.validate()?;
        let mut user = actor.require()?.clone();

        if !verify_password(&input.old_password, &user.password)? {
            return Err(AppError::BadRequest("Current password is incorrect".to_string()));
        }

        user.password = hash_password(&input.new_password)?;
        user.updated_at = Some(Utc::now().into());
        let user = self.users.update(user).await?;

        tracing::info!(user_id = %user.id, "Changed password");
        Ok(())
    }

    /// Resolve a bearer token to its user.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.users
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// All users, newest first.
    pub async fn list_users(&self) -> AppResult<Vec<user::Model>> {
        self.users.list().await
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::stores::{MemoryStore, ProfileStore, SequentialTokens};
    use std::sync::Arc;

    fn setup() -> (AccountService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let service = AccountService::new(store.clone(), Arc::new(SequentialTokens::new()));
        (service, store)
    }

    fn register_input(username: &str) -> RegisterInput {
        RegisterInput {
            full_name: "Alice Example".to_string(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "correct horse".to_string(),
        }
    }

    #[test]
    fn test_hash_password() {
        let hash = hash_password("test_password_123").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("test_password_123", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        let result = verify_password("password", "not-a-hash");
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_register_creates_user_and_profile() {
        let (service, store) = setup();

        let (user, profile) = service.register(register_input("alice")).await.unwrap();

        assert_eq!(profile.user_id, user.id);
        assert_eq!(profile.full_name.as_deref(), Some("Alice Example"));
        assert!(profile.slug.starts_with("alice-"));
        assert!(user.token.is_some());
        assert_ne!(user.password, "correct horse");

        let stored = store.profile_of(&user.id).await.unwrap();
        assert_eq!(stored, Some(profile));
    }

    #[tokio::test]
    async fn test_register_rejects_taken_username() {
        let (service, _store) = setup();
        service.register(register_input("alice")).await.unwrap();

        let mut input = register_input("alice");
        input.email = "other@example.com".to_string();
        let result = service.register(input).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_validates_input() {
        let (service, _store) = setup();

        let mut input = register_input("alice");
        input.email = "not-an-email".to_string();
        assert!(matches!(
            service.register(input).await,
            Err(AppError::Validation(_))
        ));

        let mut input = register_input("alice");
        input.password = "short".to_string();
        assert!(matches!(
            service.register(input).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_login_issues_new_token() {
        let (service, _store) = setup();
        let (registered, _) = service.register(register_input("alice")).await.unwrap();

        let user = service
            .login(LoginInput {
                email: "alice@example.com".to_string(),
                password: "correct horse".to_string(),
            })
            .await
            .unwrap();

        assert_ne!(user.token, registered.token);
        let token = user.token.clone().unwrap();
        let authenticated = service.authenticate_by_token(&token).await.unwrap();
        assert_eq!(authenticated.id, user.id);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let (service, _store) = setup();
        service.register(register_input("alice")).await.unwrap();

        let result = service
            .login(LoginInput {
                email: "alice@example.com".to_string(),
                password: "wrong password".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_logout_invalidates_token() {
        let (service, _store) = setup();
        let (user, _) = service.register(register_input("alice")).await.unwrap();
        let token = user.token.clone().unwrap();

        service.logout(&Actor::User(user)).await.unwrap();

        let result = service.authenticate_by_token(&token).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_change_password() {
        let (service, _store) = setup();
        let (user, _) = service.register(register_input("alice")).await.unwrap();
        let actor = Actor::User(user);

        let wrong = service
            .change_password(
                &actor,
                ChangePasswordInput {
                    old_password: "not it".to_string(),
                    new_password: "new password 1".to_string(),
                },
            )
            .await;
        assert!(matches!(wrong, Err(AppError::BadRequest(_))));

        service
            .change_password(
                &actor,
                ChangePasswordInput {
                    old_password: "correct horse".to_string(),
                    new_password: "new password 1".to_string(),
                },
            )
            .await
            .unwrap();

        let user = service
            .login(LoginInput {
                email: "alice@example.com".to_string(),
                password: "new password 1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(user.username, "alice");
    }
}
