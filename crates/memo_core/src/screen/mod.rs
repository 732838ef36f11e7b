//! Screen controllers and the messages exchanged between them.
//!
//! # Responsibility
//! - Define the list/edit transition contract (`EditRequest` in,
//!   `EditOutcome` out).
//! - Define the write-only rendering surfaces the UI implements.
//!
//! # Invariants
//! - Every `EditRequest` receives exactly one `EditOutcome`.
//! - `EditOutcome::Cancelled` means the store was not touched.

use crate::model::note::NoteId;
use serde::{Deserialize, Serialize};

pub mod edit_screen;
pub mod list_model;
pub mod list_screen;

/// Input record handed to the edit screen.
///
/// `id == None` means "create a new note"; `position` is the list index the
/// request came from and is echoed back untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EditRequest {
    pub id: Option<NoteId>,
    pub position: Option<usize>,
}

impl EditRequest {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn edit(id: NoteId, position: usize) -> Self {
        Self {
            id: Some(id),
            position: Some(position),
        }
    }

    pub fn is_create(&self) -> bool {
        self.id.is_none()
    }
}

/// Success record returned by a saved edit flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditResult {
    /// Text that was persisted.
    pub text: String,
    /// Original list position for updates; `None` for creations.
    pub position: Option<usize>,
    /// Id assigned to a newly created note; `None` for updates.
    pub created_id: Option<NoteId>,
}

/// Single reply of one edit flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditOutcome {
    Saved(EditResult),
    Cancelled,
}

impl EditOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }
}

/// Completion handler the list screen uses to run one edit flow.
///
/// Implementations drive the edit screen to its terminal phase and return
/// its reply; the list screen resumes once `launch` returns.
pub trait EditLauncher {
    type Error;

    fn launch(&mut self, request: EditRequest) -> Result<EditOutcome, Self::Error>;
}

/// Rendering surface of the list screen.
pub trait ListRenderer {
    fn render_list(&mut self, items: &[String]);
}

/// Rendering surface of the edit screen.
pub trait EditRenderer {
    fn render_text(&mut self, text: &str);
}

/// Renderer that discards every frame, for headless callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRenderer;

impl ListRenderer for NoopRenderer {
    fn render_list(&mut self, _items: &[String]) {}
}

impl EditRenderer for NoopRenderer {
    fn render_text(&mut self, _text: &str) {}
}
