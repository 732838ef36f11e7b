//! Note domain model.
//!
//! # Responsibility
//! - Define the single persisted record of the app.
//! - Own id generation and text validation rules.
//!
//! # Invariants
//! - `id` is generated once and never reassigned.
//! - `text` must contain at least one non-whitespace character to persist.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque note identifier.
///
/// Freshly created notes get a UUID v4 string, but any non-empty string read
/// back from storage or passed in by the UI is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Generates a new globally unique identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Validation failures for note writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Text is empty or whitespace only.
    BlankText,
    /// Identifier is an empty string.
    BlankId,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankText => write!(f, "note text must not be blank"),
            Self::BlankId => write!(f, "note id must not be blank"),
        }
    }
}

impl Error for NoteValidationError {}

/// The persisted memo record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub text: String,
}

impl Note {
    /// Creates a note with a freshly generated id.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_id(NoteId::generate(), text)
    }

    /// Creates a note with a caller-provided id.
    ///
    /// Used when hydrating rows and by tests seeding known identifiers.
    pub fn with_id(id: NoteId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }

    /// Checks the write-path invariants.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(NoteValidationError::BlankId);
        }
        if is_blank(&self.text) {
            return Err(NoteValidationError::BlankText);
        }
        Ok(())
    }
}

/// Returns whether `text` has nothing worth saving.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
