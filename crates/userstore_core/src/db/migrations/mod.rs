//! Fixed schema for `users` and `user_preferences`.
//!
//! Each step is tagged with the `user_version` it leaves behind; the list
//! must stay strictly increasing.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

const SCHEMA_STEPS: &[(u32, &str)] = &[(1, include_str!("0001_users.sql"))];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchemaState {
    Current,
    Behind(u32),
}

/// Latest schema version this build can write.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |(version, _)| *version)
}

/// Brings the connection up to `latest_version()` inside one transaction.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = match schema_state(conn)? {
        SchemaState::Current => return Ok(()),
        SchemaState::Behind(version) => version,
    };

    let tx = conn.transaction()?;
    for (version, sql) in SCHEMA_STEPS {
        if *version > from_version {
            tx.execute_batch(sql)?;
            tx.pragma_update(None, "user_version", version)?;
        }
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={from_version} to_version={}",
        latest_version()
    );
    Ok(())
}

fn schema_state(conn: &Connection) -> DbResult<SchemaState> {
    let db_version: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    let latest_supported = latest_version();

    if db_version > latest_supported {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        });
    }
    if db_version == latest_supported {
        Ok(SchemaState::Current)
    } else {
        Ok(SchemaState::Behind(db_version))
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, latest_version, SCHEMA_STEPS};
    use rusqlite::Connection;

    #[test]
    fn schema_steps_are_strictly_increasing() {
        assert!(SCHEMA_STEPS
            .windows(2)
            .all(|pair| pair[0].0 < pair[1].0));
        assert!(latest_version() > 0);
    }

    #[test]
    fn applying_twice_is_a_no_op() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        apply_migrations(&mut conn).unwrap();

        let version: u32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version, latest_version());
    }
}
