//! User record operations.
//!
//! # Responsibility
//! - Provide list-all, create, find-by-email, update-by-email and
//!   delete-by-email as independent units of work.
//! - Print lookup results to an injected sink; return mutated records.
//!
//! # Invariants
//! - Each operation issues exactly one repository call.
//! - No operation retries or recovers; failures propagate unchanged.

use crate::db::DbError;
use crate::model::user::{NewUser, User, UserFilter, UserUpdate};
use crate::output::{write_record, OutputError};
use crate::repo::user_repo::{RepoError, UserRepository};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::time::Instant;

pub const DEFAULT_USER_NAME: &str = "Hosen";
pub const DEFAULT_USER_AGE: i32 = 24;
pub const DEFAULT_USER_EMAIL: &str = "hosen@test.com";
pub const DEFAULT_EMAIL_UPDATES: bool = true;
pub const DEFAULT_RENAMED_NAME: &str = "Md. Sabbir Hosen";
pub const DEFAULT_DELETE_EMAIL: &str = "sabbir@test.com";

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure of one record operation.
#[derive(Debug)]
pub enum ServiceError {
    Repo(RepoError),
    Output(OutputError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Output(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Output(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<DbError> for ServiceError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}

impl From<OutputError> for ServiceError {
    fn from(value: OutputError) -> Self {
        Self::Output(value)
    }
}

/// The fixed create payload: Hosen, 24, `hosen@test.com`, email updates on.
pub fn default_new_user() -> NewUser {
    NewUser::new(DEFAULT_USER_NAME, DEFAULT_USER_AGE, DEFAULT_USER_EMAIL)
        .with_preference(DEFAULT_EMAIL_UPDATES)
}

/// Use-case service wrapping a user repository.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Prints every user to `out`.
    pub fn list_all<W: Write + ?Sized>(&self, out: &mut W) -> ServiceResult<()> {
        observe("user_list", || {
            let users = self.repo.find_many()?;
            write_record(out, &users)?;
            Ok(())
        })
    }

    /// Creates the fixed default user with its nested preference.
    pub fn create_default_user(&self) -> ServiceResult<User> {
        self.create_user(&default_new_user())
    }

    /// Creates a user from a caller payload.
    ///
    /// Fails with `RepoError::UniqueViolation` when the email is taken.
    pub fn create_user(&self, user: &NewUser) -> ServiceResult<User> {
        observe("user_create", || Ok(self.repo.create(user)?))
    }

    /// Prints the user with `email` to `out`, or `null` when absent.
    pub fn find_by_email<W: Write + ?Sized>(&self, email: &str, out: &mut W) -> ServiceResult<()> {
        observe("user_find", || {
            let user = self.repo.find_unique(&UserFilter::by_email(email))?;
            write_record(out, &user)?;
            Ok(())
        })
    }

    /// Renames the user with `email` and returns the updated record.
    ///
    /// Fails with `RepoError::NotFound` when no user matches.
    pub fn update_name_by_email(&self, email: &str, name: &str) -> ServiceResult<User> {
        observe("user_update", || {
            Ok(self
                .repo
                .update(&UserFilter::by_email(email), &UserUpdate::name(name))?)
        })
    }

    /// Deletes the user with `email`; the removed record is discarded.
    ///
    /// Fails with `RepoError::NotFound` when no user matches.
    pub fn delete_by_email(&self, email: &str) -> ServiceResult<()> {
        observe("user_delete", || {
            self.repo.delete(&UserFilter::by_email(email))?;
            Ok(())
        })
    }
}

fn observe<T, F>(event: &'static str, operation: F) -> ServiceResult<T>
where
    F: FnOnce() -> ServiceResult<T>,
{
    let started_at = Instant::now();
    let result = operation();
    match &result {
        Ok(_) => info!(
            "event={event} module=service status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event={event} module=service status=error duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}
