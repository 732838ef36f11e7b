//! Note store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/read/update over the `notes` table.
//! - Wrap every mutation in its own `IMMEDIATE` transaction.
//!
//! # Invariants
//! - `find_all` returns notes in insertion order (`seq ASC`).
//! - `update` never changes `id` and is a silent no-op for unknown ids.
//! - Note text never reaches the log; only its length does.

use crate::model::note::{is_blank, Note, NoteId, NoteValidationError};
use crate::repo::{Persistable, RepoError, RepoResult};
use log::{debug, info, warn};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::time::Instant;

impl Persistable for Note {
    type Id = NoteId;

    const TABLE: &'static str = "notes";

    fn record_id(&self) -> &NoteId {
        &self.id
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let id: String = row.get("id")?;
        if id.trim().is_empty() {
            return Err(RepoError::InvalidData(format!(
                "blank id in {}.id",
                Self::TABLE
            )));
        }
        Ok(Note::with_id(NoteId::from(id), row.get::<_, String>("text")?))
    }
}

/// Data access contract for notes.
pub trait NoteStore {
    /// Returns the note with `id`, or `None` when absent.
    fn find_by_id(&self, id: &NoteId) -> RepoResult<Option<Note>>;
    /// Returns every persisted note in insertion order.
    fn find_all(&self) -> RepoResult<Vec<Note>>;
    /// Persists a new note with a freshly generated id.
    fn create(&mut self, text: &str) -> RepoResult<Note>;
    /// Replaces the text of the note with `id`; unknown ids are ignored.
    fn update(&mut self, id: &NoteId, text: &str) -> RepoResult<()>;
    /// Returns the number of persisted notes.
    fn count(&self) -> RepoResult<usize>;
}

/// SQLite-backed note store borrowing the application connection.
pub struct SqliteNoteStore<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteNoteStore<'conn> {
    /// Wraps a connection returned by `db::open_db*` (already migrated).
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl NoteStore for SqliteNoteStore<'_> {
    fn find_by_id(&self, id: &NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT id, text FROM {} WHERE id = ?1;", Note::TABLE))?;
        let mut rows = stmt.query([id.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(Note::from_row(row)?));
        }

        debug!("event=note_find module=repo status=miss");
        Ok(None)
    }

    fn find_all(&self) -> RepoResult<Vec<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT id, text FROM {} ORDER BY seq ASC;", Note::TABLE))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(Note::from_row(row)?);
        }

        debug!(
            "event=note_list module=repo status=ok count={}",
            notes.len()
        );
        Ok(notes)
    }

    fn create(&mut self, text: &str) -> RepoResult<Note> {
        let started_at = Instant::now();
        let note = Note::new(text);
        note.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            &format!("INSERT INTO {} (id, text) VALUES (?1, ?2);", Note::TABLE),
            params![note.record_id().as_str(), note.text.as_str()],
        )?;
        tx.commit()?;

        info!(
            "event=note_create module=repo status=ok text_len={} duration_ms={}",
            note.text.chars().count(),
            started_at.elapsed().as_millis()
        );
        Ok(note)
    }

    fn update(&mut self, id: &NoteId, text: &str) -> RepoResult<()> {
        let started_at = Instant::now();
        // Only the text is checked; an id matching no row is a no-op below.
        if is_blank(text) {
            return Err(NoteValidationError::BlankText.into());
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let existing = tx
            .query_row(
                &format!("SELECT seq FROM {} WHERE id = ?1;", Note::TABLE),
                [id.as_str()],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;

        let Some(seq) = existing else {
            // Nothing to update; the empty transaction is dropped (rolled back).
            warn!("event=note_update module=repo status=miss");
            return Ok(());
        };

        tx.execute(
            &format!(
                "UPDATE {}
                 SET
                    text = ?1,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE seq = ?2;",
                Note::TABLE
            ),
            params![text, seq],
        )?;
        tx.commit()?;

        info!(
            "event=note_update module=repo status=ok text_len={} duration_ms={}",
            text.chars().count(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    fn count(&self) -> RepoResult<usize> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {};", Note::TABLE), [], |row| {
                row.get(0)
            })?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}
