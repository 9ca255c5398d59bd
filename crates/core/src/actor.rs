//! The party performing an operation.

use ideaboard_common::{AppError, AppResult};
use ideaboard_db::entities::user;

/// The authenticated user of a request, or nobody.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Actor {
    /// No valid credentials were presented.
    #[default]
    Anonymous,
    /// A signed-in user.
    User(user::Model),
}

impl Actor {
    /// Returns the user, or [`AppError::Unauthorized`] for an anonymous actor.
    pub const fn require(&self) -> AppResult<&user::Model> {
        match self {
            Self::User(user) => Ok(user),
            Self::Anonymous => Err(AppError::Unauthorized),
        }
    }

    /// Returns the user if signed in.
    #[must_use]
    pub const fn user(&self) -> Option<&user::Model> {
        match self {
            Self::User(user) => Some(user),
            Self::Anonymous => None,
        }
    }

    /// Whether the actor is anonymous.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }
}

impl From<Option<user::Model>> for Actor {
    fn from(user: Option<user::Model>) -> Self {
        user.map_or(Self::Anonymous, Self::User)
    }
}
