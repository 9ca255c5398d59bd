//! Business logic services.

#![allow(missing_docs)]

pub mod account;
pub mod follow_graph;
pub mod idea;
pub mod notification;
pub mod profile;

#[cfg(test)]
mod test_support;

pub use account::{AccountService, ChangePasswordInput, LoginInput, RegisterInput};
pub use follow_graph::{FollowGraphService, FollowRelation};
pub use idea::{
    CreateIdeaInput, DislikeToggle, IdeaDetails, IdeaService, LikeToggle, UpdateIdeaInput,
};
pub use notification::NotificationService;
pub use profile::{ProfileDetails, ProfileService, UpdateProfileInput};
