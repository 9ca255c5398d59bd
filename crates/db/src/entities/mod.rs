//! Database entities.

#![allow(missing_docs)]

pub mod follow_request;
pub mod idea;
pub mod idea_vote;
pub mod notification;
pub mod profile;
pub mod profile_follower;
pub mod user;

pub use follow_request::Entity as FollowRequest;
pub use idea::Entity as Idea;
pub use idea_vote::Entity as IdeaVote;
pub use notification::Entity as Notification;
pub use profile::Entity as Profile;
pub use profile_follower::Entity as ProfileFollower;
pub use user::Entity as User;
