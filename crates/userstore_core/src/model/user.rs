//! User and user preference records.
//!
//! # Responsibility
//! - Define persisted records returned by the data-access client.
//! - Define write payloads (`NewUser`, `UserUpdate`) and the email filter.
//!
//! # Invariants
//! - Write payloads must pass `validate()` before any SQL mutation.
//! - A preference exists only as a nested part of one user.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type UserId = Uuid;
pub type UserPreferenceId = Uuid;

/// Notification preference attached one-to-one to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreference {
    pub id: UserPreferenceId,
    pub email_updates: bool,
}

/// Persisted user record.
///
/// Serialized with camelCase names (`userPreference`, `emailUpdates`) to
/// match the record shape external callers already consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub age: i32,
    pub email: String,
    pub user_preference: Option<UserPreference>,
}

/// Nested preference payload for `NewUser`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserPreference {
    pub email_updates: bool,
}

/// Create payload. Identifiers are generated by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub age: i32,
    pub email: String,
    pub user_preference: Option<NewUserPreference>,
}

impl NewUser {
    /// Creates a payload without a nested preference.
    pub fn new(name: impl Into<String>, age: i32, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age,
            email: email.into(),
            user_preference: None,
        }
    }

    /// Attaches a nested preference to be created with the user.
    pub fn with_preference(mut self, email_updates: bool) -> Self {
        self.user_preference = Some(NewUserPreference { email_updates });
        self
    }

    pub fn validate(&self) -> Result<(), UserValidationError> {
        validate_name(&self.name)?;
        validate_age(self.age)?;
        validate_email(&self.email)
    }
}

/// Partial update payload. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub email: Option<String>,
}

impl UserUpdate {
    /// Update that only renames the user.
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), UserValidationError> {
        if let Some(name) = self.name.as_deref() {
            validate_name(name)?;
        }
        if let Some(age) = self.age {
            validate_age(age)?;
        }
        if let Some(email) = self.email.as_deref() {
            validate_email(email)?;
        }
        Ok(())
    }
}

/// Unique filter identifying one user by email.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserFilter {
    pub email: String,
}

impl UserFilter {
    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

/// Payload validation failures raised before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    BlankName,
    BlankEmail,
    NegativeAge(i32),
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "user name must not be blank"),
            Self::BlankEmail => write!(f, "user email must not be blank"),
            Self::NegativeAge(age) => write!(f, "user age must not be negative, got {age}"),
        }
    }
}

impl Error for UserValidationError {}

fn validate_name(name: &str) -> Result<(), UserValidationError> {
    if name.trim().is_empty() {
        return Err(UserValidationError::BlankName);
    }
    Ok(())
}

fn validate_age(age: i32) -> Result<(), UserValidationError> {
    if age < 0 {
        return Err(UserValidationError::NegativeAge(age));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.trim().is_empty() {
        return Err(UserValidationError::BlankEmail);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{NewUser, UserUpdate, UserValidationError};

    #[test]
    fn new_user_validation_rejects_blank_fields() {
        assert_eq!(
            NewUser::new("  ", 24, "a@test.com").validate(),
            Err(UserValidationError::BlankName)
        );
        assert_eq!(
            NewUser::new("Hosen", 24, "").validate(),
            Err(UserValidationError::BlankEmail)
        );
        assert_eq!(
            NewUser::new("Hosen", -1, "a@test.com").validate(),
            Err(UserValidationError::NegativeAge(-1))
        );
    }

    #[test]
    fn update_validation_only_checks_present_fields() {
        assert!(UserUpdate::default().validate().is_ok());
        assert!(UserUpdate::name("Md. Sabbir Hosen").validate().is_ok());

        let bad = UserUpdate {
            email: Some(" ".to_string()),
            ..UserUpdate::default()
        };
        assert_eq!(bad.validate(), Err(UserValidationError::BlankEmail));
    }
}
