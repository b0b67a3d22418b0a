//! Core user store: records, data-access client and record operations.

pub mod client;
pub mod db;
pub mod logging;
pub mod model;
pub mod output;
pub mod repo;
pub mod service;

pub use client::{with_client, Client};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::user::{
    NewUser, NewUserPreference, User, UserFilter, UserId, UserPreference, UserPreferenceId,
    UserUpdate, UserValidationError,
};
pub use repo::user_repo::{RepoError, RepoResult, SqliteUserRepository, UserRepository};
pub use service::user_service::{default_new_user, ServiceError, ServiceResult, UserService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
