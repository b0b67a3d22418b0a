//! Owned data-access client with explicit release.
//!
//! # Responsibility
//! - Own the single SQLite connection used by one run of record operations.
//! - Hand out repositories borrowing that connection.
//! - Release the connection through `disconnect`, on success and failure.
//!
//! # Invariants
//! - There is no process-wide client; callers construct and pass one.
//! - `with_client` always disconnects, and a disconnect failure never hides
//!   the operation's own error.

use crate::db::{open_db, open_db_in_memory, DbError, DbResult};
use crate::repo::user_repo::{RepoResult, SqliteUserRepository};
use log::{info, warn};
use rusqlite::Connection;
use std::path::Path;

/// Data-access client wrapping one migrated connection.
pub struct Client {
    conn: Connection,
}

impl Client {
    /// Opens a file-backed store, creating it and its schema when missing.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a fresh in-memory store.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns the user repository bound to this client's connection.
    pub fn users(&self) -> RepoResult<SqliteUserRepository<'_>> {
        SqliteUserRepository::try_new(&self.conn)
    }

    /// Closes the underlying connection.
    pub fn disconnect(self) -> DbResult<()> {
        match self.conn.close() {
            Ok(()) => {
                info!("event=client_disconnect module=client status=ok");
                Ok(())
            }
            Err((_conn, err)) => {
                warn!(
                    "event=client_disconnect module=client status=error error_code=db_close_failed error={}",
                    err
                );
                Err(err.into())
            }
        }
    }
}

/// Runs `operation` against `client`, then disconnects regardless of outcome.
///
/// # Errors
/// - Returns the operation's error when it fails; a disconnect failure on
///   that path is logged only.
/// - Returns the disconnect error when the operation succeeded.
pub fn with_client<T, E, F>(client: Client, operation: F) -> Result<T, E>
where
    F: FnOnce(&Client) -> Result<T, E>,
    E: From<DbError>,
{
    let result = operation(&client);
    let released = client.disconnect();

    match (result, released) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(err)) => Err(err.into()),
        (Err(err), _) => Err(err),
    }
}
