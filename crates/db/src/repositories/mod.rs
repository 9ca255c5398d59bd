//! Database repositories.

mod follow_request;
mod idea;
mod idea_vote;
mod notification;
mod profile;
mod profile_follower;
mod user;

pub use follow_request::FollowRequestRepository;
pub use idea::{IdeaQuery, IdeaRepository};
pub use idea_vote::IdeaVoteRepository;
pub use notification::NotificationRepository;
pub use profile::ProfileRepository;
pub use profile_follower::ProfileFollowerRepository;
pub use user::UserRepository;

use ideaboard_common::AppError;
use sea_orm::{DbErr, SqlErr};

/// Whether the error is a unique constraint violation reported by the database.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Map a database error, turning unique constraint violations into `conflict`.
pub(crate) fn map_unique_violation(err: DbErr, conflict: AppError) -> AppError {
    if is_unique_violation(&err) {
        conflict
    } else {
        AppError::Database(err.to_string())
    }
}
