//! Domain model for memo notes.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId` assigned at creation.
//! - Blank text is never a valid persisted note.

pub mod note;
