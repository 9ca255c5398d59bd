//! Common utilities and shared types for ideaboard.
//!
//! This crate provides foundational components used across all ideaboard crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID primary keys, short tokens and slugs via [`IdGenerator`]
//!
//! # Example
//!
//! ```no_run
//! use ideaboard_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let token = id_gen.generate_short_token();
//!     println!("Listening on {}:{} ({token})", config.server.host, config.server.port);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
