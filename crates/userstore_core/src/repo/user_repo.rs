//! User repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide `find_many`/`create`/`find_unique`/`update`/`delete` over the
//!   `users` and `user_preferences` tables.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Every mutation runs in one immediate transaction; a failed write leaves
//!   the store unchanged.
//! - Users are always returned with their preference joined in.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::user::{
    NewUser, User, UserFilter, UserPreference, UserUpdate, UserValidationError,
};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const USER_SELECT_SQL: &str = "SELECT
    u.id AS id,
    u.name AS name,
    u.age AS age,
    u.email AS email,
    p.id AS preference_id,
    p.email_updates AS email_updates
FROM users u
LEFT JOIN user_preferences p ON p.id = u.user_preference_id";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for user persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(UserValidationError),
    Db(DbError),
    NotFound {
        email: String,
    },
    UniqueViolation {
        email: String,
    },
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { email } => write!(f, "user not found: {email}"),
            Self::UniqueViolation { email } => {
                write!(f, "a user with email `{email}` already exists")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted user data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<UserValidationError> for RepoError {
    fn from(value: UserValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Data-access contract for user records.
pub trait UserRepository {
    /// Returns every user in insertion order.
    fn find_many(&self) -> RepoResult<Vec<User>>;
    /// Creates a user and its nested preference, returning the stored record.
    fn create(&self, user: &NewUser) -> RepoResult<User>;
    /// Looks up one user by email.
    fn find_unique(&self, filter: &UserFilter) -> RepoResult<Option<User>>;
    /// Applies a partial update and returns the updated record.
    fn update(&self, filter: &UserFilter, data: &UserUpdate) -> RepoResult<User>;
    /// Deletes a user (and its preference) and returns the removed record.
    fn delete(&self, filter: &UserFilter) -> RepoResult<User>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not current.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` for foreign schemas.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_user_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn find_many(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY u.rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();

        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }

        Ok(users)
    }

    fn create(&self, user: &NewUser) -> RepoResult<User> {
        user.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let user_preference = match user.user_preference {
            Some(payload) => {
                let preference = UserPreference {
                    id: Uuid::new_v4(),
                    email_updates: payload.email_updates,
                };
                tx.execute(
                    "INSERT INTO user_preferences (id, email_updates) VALUES (?1, ?2);",
                    params![
                        preference.id.to_string(),
                        bool_to_int(preference.email_updates)
                    ],
                )?;
                Some(preference)
            }
            None => None,
        };

        let id = Uuid::new_v4();
        tx.execute(
            "INSERT INTO users (
                id,
                name,
                age,
                email,
                user_preference_id
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                id.to_string(),
                user.name.as_str(),
                user.age,
                user.email.as_str(),
                user_preference.as_ref().map(|preference| preference.id.to_string()),
            ],
        )
        .map_err(|err| map_write_error(err, &user.email))?;

        tx.commit()?;

        Ok(User {
            id,
            name: user.name.clone(),
            age: user.age,
            email: user.email.clone(),
            user_preference,
        })
    }

    fn find_unique(&self, filter: &UserFilter) -> RepoResult<Option<User>> {
        select_by_email(self.conn, &filter.email)
    }

    fn update(&self, filter: &UserFilter, data: &UserUpdate) -> RepoResult<User> {
        data.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let target_email = data.email.as_deref().unwrap_or(filter.email.as_str());

        let changed = tx
            .execute(
                "UPDATE users
                 SET
                    name = COALESCE(?2, name),
                    age = COALESCE(?3, age),
                    email = COALESCE(?4, email)
                 WHERE email = ?1;",
                params![
                    filter.email.as_str(),
                    data.name.as_deref(),
                    data.age,
                    data.email.as_deref(),
                ],
            )
            .map_err(|err| map_write_error(err, target_email))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                email: filter.email.clone(),
            });
        }

        let user = select_by_email(&tx, target_email)?.ok_or_else(|| {
            RepoError::InvalidData(format!("updated user `{target_email}` is not readable"))
        })?;
        tx.commit()?;

        Ok(user)
    }

    fn delete(&self, filter: &UserFilter) -> RepoResult<User> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let user = select_by_email(&tx, &filter.email)?.ok_or_else(|| RepoError::NotFound {
            email: filter.email.clone(),
        })?;

        tx.execute("DELETE FROM users WHERE id = ?1;", [user.id.to_string()])?;
        if let Some(preference) = user.user_preference.as_ref() {
            tx.execute(
                "DELETE FROM user_preferences WHERE id = ?1;",
                [preference.id.to_string()],
            )?;
        }
        tx.commit()?;

        Ok(user)
    }
}

fn select_by_email(conn: &Connection, email: &str) -> RepoResult<Option<User>> {
    let mut stmt = conn.prepare(&format!("{USER_SELECT_SQL} WHERE u.email = ?1;"))?;
    let mut rows = stmt.query([email])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_user_row(row)?));
    }

    Ok(None)
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let id_text: String = row.get("id")?;
    let id = parse_uuid(&id_text, "users.id")?;

    let user_preference = match row.get::<_, Option<String>>("preference_id")? {
        Some(preference_text) => {
            let email_updates = match row.get::<_, Option<i64>>("email_updates")? {
                Some(value) => int_to_bool(value, "user_preferences.email_updates")?,
                None => {
                    return Err(RepoError::InvalidData(format!(
                        "missing email_updates for preference `{preference_text}`"
                    )));
                }
            };
            Some(UserPreference {
                id: parse_uuid(&preference_text, "user_preferences.id")?,
                email_updates,
            })
        }
        None => None,
    };

    Ok(User {
        id,
        name: row.get("name")?,
        age: row.get("age")?,
        email: row.get("email")?,
        user_preference,
    })
}

fn map_write_error(err: rusqlite::Error, email: &str) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RepoError::UniqueViolation {
                email: email.to_string(),
            }
        }
        _ => err.into(),
    }
}

fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

fn int_to_bool(value: i64, column: &'static str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn ensure_user_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let required: [(&'static str, &[&'static str]); 2] = [
        ("user_preferences", &["id", "email_updates"]),
        (
            "users",
            &["id", "name", "age", "email", "user_preference_id"],
        ),
    ];

    for (table, columns) in required {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
