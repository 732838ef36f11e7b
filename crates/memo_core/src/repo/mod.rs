//! Repository layer: note persistence contracts and the SQLite store.
//!
//! # Responsibility
//! - Define the data access contract consumed by screen controllers.
//! - Isolate SQL details from controller orchestration.
//!
//! # Invariants
//! - Write paths call `Note::validate()` before any SQL mutation.
//! - Lookups by id report absence as `None`, never as an error.

use crate::db::DbError;
use crate::model::note::NoteValidationError;
use rusqlite::Row;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod note_store;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(NoteValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
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

/// Capability of a plain record that a store can persist.
///
/// Records describe how they are identified and hydrated; the store owns
/// every SQL statement and transaction.
pub trait Persistable: Sized {
    type Id;

    /// Backing table name.
    const TABLE: &'static str;

    /// Stable identity of this record.
    fn record_id(&self) -> &Self::Id;

    /// Hydrates one record from a row selected by the store.
    fn from_row(row: &Row<'_>) -> RepoResult<Self>;
}
