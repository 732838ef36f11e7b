//! Schema installer for the `notes` table.
//!
//! The full schema is one script. `PRAGMA user_version` records that it ran,
//! so reopening an initialized file does no work.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;
use std::cmp::Ordering;

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_SQL: &str = include_str!("0001_init.sql");

/// Returns the newest schema version this build can open.
pub fn latest_version() -> u32 {
    SCHEMA_VERSION
}

/// Installs the schema on a fresh file; accepts an already current one.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    match found.cmp(&SCHEMA_VERSION) {
        Ordering::Equal => Ok(()),
        Ordering::Greater => Err(DbError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        }),
        Ordering::Less => {
            let tx = conn.transaction()?;
            tx.execute_batch(SCHEMA_SQL)?;
            tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
            tx.commit()?;

            info!(
                "event=db_migrate module=db status=ok from_version={found} to_version={SCHEMA_VERSION}"
            );
            Ok(())
        }
    }
}
