//! In-memory projection of the list screen.
//!
//! Holds display text only. It is patched in place after each edit flow and
//! may drift from the store if something else writes to it.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListModelError {
    OutOfBounds { position: usize, len: usize },
}

impl Display for ListModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfBounds { position, len } => {
                write!(f, "position {position} out of bounds for list of {len}")
            }
        }
    }
}

impl Error for ListModelError {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteListModel {
    items: Vec<String>,
}

impl NoteListModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole sequence, keeping the given order.
    pub fn load<I, S>(&mut self, texts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = texts.into_iter().map(Into::into).collect();
    }

    /// Inserts at `position`, shifting later entries. `position == len`
    /// behaves like `append`.
    pub fn insert_at(
        &mut self,
        text: impl Into<String>,
        position: usize,
    ) -> Result<(), ListModelError> {
        if position > self.items.len() {
            return Err(self.out_of_bounds(position));
        }
        self.items.insert(position, text.into());
        Ok(())
    }

    /// Removes the entry at `position` and inserts `text` in its place.
    pub fn replace_at(
        &mut self,
        text: impl Into<String>,
        position: usize,
    ) -> Result<(), ListModelError> {
        if position >= self.items.len() {
            return Err(self.out_of_bounds(position));
        }
        self.items.remove(position);
        self.items.insert(position, text.into());
        Ok(())
    }

    pub fn append(&mut self, text: impl Into<String>) {
        self.items.push(text.into());
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn get(&self, position: usize) -> Option<&str> {
        self.items.get(position).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn out_of_bounds(&self, position: usize) -> ListModelError {
        ListModelError::OutOfBounds {
            position,
            len: self.items.len(),
        }
    }
}
