//! Add/edit screen controller.
//!
//! # Responsibility
//! - Pre-fill the editor from the store when editing an existing note.
//! - On finish, create or update the note, or cancel on blank input.
//!
//! # Invariants
//! - Phases only move forward: `Loading -> Editing -> {Saved, Cancelled}`.
//! - Blank text never reaches the store.
//! - The request `position` is echoed back unchanged on update.

use crate::model::note::is_blank;
use crate::repo::note_store::NoteStore;
use crate::repo::RepoError;
use crate::screen::{EditLauncher, EditOutcome, EditRenderer, EditRequest, EditResult, NoopRenderer};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lifecycle of one edit screen activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPhase {
    Loading,
    Editing,
    Saved,
    Cancelled,
}

impl EditPhase {
    fn label(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Editing => "editing",
            Self::Saved => "saved",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug)]
pub enum EditScreenError {
    /// Operation requires the `Editing` phase.
    NotEditing(EditPhase),
    Repo(RepoError),
}

impl Display for EditScreenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotEditing(phase) => {
                write!(f, "edit screen is {}, not editing", phase.label())
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EditScreenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::NotEditing(_) => None,
        }
    }
}

impl From<RepoError> for EditScreenError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

#[derive(Debug)]
pub struct EditScreen {
    request: EditRequest,
    text: String,
    phase: EditPhase,
}

impl EditScreen {
    /// Activates the screen for `request` and renders the initial text.
    ///
    /// A request for an id the store no longer has opens a blank editor.
    pub fn activate<S, R>(
        store: &S,
        request: EditRequest,
        renderer: &mut R,
    ) -> Result<Self, EditScreenError>
    where
        S: NoteStore + ?Sized,
        R: EditRenderer + ?Sized,
    {
        let mut screen = Self {
            request,
            text: String::new(),
            phase: EditPhase::Loading,
        };

        if let Some(id) = screen.request.id.as_ref() {
            match store.find_by_id(id)? {
                Some(note) => screen.text = note.text,
                None => warn!("event=edit_activate module=screen status=miss"),
            }
        }

        screen.phase = EditPhase::Editing;
        renderer.render_text(&screen.text);
        debug!(
            "event=edit_activate module=screen status=ok mode={}",
            screen.mode()
        );
        Ok(screen)
    }

    /// Replaces the in-progress text with what the user typed.
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<(), EditScreenError> {
        self.ensure_editing()?;
        self.text = text.into();
        Ok(())
    }

    /// Ends the flow: persists non-blank text, otherwise cancels.
    ///
    /// On a store failure the screen stays in `Editing`, so the caller may
    /// retry or cancel.
    pub fn finish<S>(&mut self, store: &mut S) -> Result<EditOutcome, EditScreenError>
    where
        S: NoteStore + ?Sized,
    {
        self.ensure_editing()?;

        if is_blank(&self.text) {
            self.phase = EditPhase::Cancelled;
            info!(
                "event=edit_finish module=screen status=cancelled mode={}",
                self.mode()
            );
            return Ok(EditOutcome::Cancelled);
        }

        let result = match self.request.id.as_ref() {
            None => {
                let note = store.create(&self.text)?;
                EditResult {
                    text: note.text,
                    position: None,
                    created_id: Some(note.id),
                }
            }
            Some(id) => {
                store.update(id, &self.text)?;
                EditResult {
                    text: self.text.clone(),
                    position: self.request.position,
                    created_id: None,
                }
            }
        };

        self.phase = EditPhase::Saved;
        info!(
            "event=edit_finish module=screen status=saved mode={}",
            self.mode()
        );
        Ok(EditOutcome::Saved(result))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn phase(&self) -> EditPhase {
        self.phase
    }

    fn ensure_editing(&self) -> Result<(), EditScreenError> {
        if self.phase == EditPhase::Editing {
            Ok(())
        } else {
            Err(EditScreenError::NotEditing(self.phase))
        }
    }

    fn mode(&self) -> &'static str {
        if self.request.is_create() {
            "create"
        } else {
            "update"
        }
    }
}

/// Launcher that runs the edit screen in-process against a store.
///
/// `input` receives the pre-filled text and returns what the user submitted.
pub struct InlineEditLauncher<'s, S: ?Sized, F> {
    store: &'s mut S,
    input: F,
}

impl<'s, S, F> InlineEditLauncher<'s, S, F>
where
    S: NoteStore + ?Sized,
    F: FnMut(&str) -> String,
{
    pub fn new(store: &'s mut S, input: F) -> Self {
        Self { store, input }
    }
}

impl<S, F> EditLauncher for InlineEditLauncher<'_, S, F>
where
    S: NoteStore + ?Sized,
    F: FnMut(&str) -> String,
{
    type Error = EditScreenError;

    fn launch(&mut self, request: EditRequest) -> Result<EditOutcome, EditScreenError> {
        let mut screen = EditScreen::activate(&*self.store, request, &mut NoopRenderer)?;
        let submitted = (self.input)(screen.text());
        screen.set_text(submitted)?;
        screen.finish(&mut *self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::{EditPhase, EditScreen, EditScreenError};
    use crate::db::open_db_in_memory;
    use crate::model::note::NoteId;
    use crate::repo::note_store::{NoteStore, SqliteNoteStore};
    use crate::screen::{EditOutcome, EditRenderer, EditRequest, NoopRenderer};

    #[derive(Default)]
    struct RecordingRenderer {
        frames: Vec<String>,
    }

    impl EditRenderer for RecordingRenderer {
        fn render_text(&mut self, text: &str) {
            self.frames.push(text.to_string());
        }
    }

    #[test]
    fn activate_prefills_existing_text() {
        let mut conn = open_db_in_memory().unwrap();
        let mut store = SqliteNoteStore::new(&mut conn);
        let note = store.create("draft").unwrap();
        let mut renderer = RecordingRenderer::default();

        let screen =
            EditScreen::activate(&store, EditRequest::edit(note.id, 0), &mut renderer).unwrap();
        assert_eq!(screen.text(), "draft");
        assert_eq!(screen.phase(), EditPhase::Editing);
        assert_eq!(renderer.frames, vec!["draft".to_string()]);
    }

    #[test]
    fn activate_with_unknown_id_opens_blank_editor() {
        let mut conn = open_db_in_memory().unwrap();
        let store = SqliteNoteStore::new(&mut conn);

        let screen = EditScreen::activate(
            &store,
            EditRequest::edit(NoteId::from("gone"), 3),
            &mut NoopRenderer,
        )
        .unwrap();
        assert_eq!(screen.text(), "");
    }

    #[test]
    fn whitespace_only_text_cancels() {
        let mut conn = open_db_in_memory().unwrap();
        let mut store = SqliteNoteStore::new(&mut conn);
        let mut screen =
            EditScreen::activate(&store, EditRequest::create(), &mut NoopRenderer).unwrap();

        screen.set_text("  \n ").unwrap();
        assert_eq!(screen.finish(&mut store).unwrap(), EditOutcome::Cancelled);
        assert_eq!(screen.phase(), EditPhase::Cancelled);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn finished_screen_rejects_further_input() {
        let mut conn = open_db_in_memory().unwrap();
        let mut store = SqliteNoteStore::new(&mut conn);
        let mut screen =
            EditScreen::activate(&store, EditRequest::create(), &mut NoopRenderer).unwrap();
        screen.set_text("once").unwrap();
        assert!(screen.finish(&mut store).unwrap().is_saved());

        assert!(matches!(
            screen.set_text("twice"),
            Err(EditScreenError::NotEditing(EditPhase::Saved))
        ));
        assert!(screen.finish(&mut store).is_err());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn update_echoes_request_position() {
        let mut conn = open_db_in_memory().unwrap();
        let mut store = SqliteNoteStore::new(&mut conn);
        let note = store.create("v1").unwrap();
        let mut screen =
            EditScreen::activate(&store, EditRequest::edit(note.id.clone(), 7), &mut NoopRenderer)
                .unwrap();

        screen.set_text("v2").unwrap();
        match screen.finish(&mut store).unwrap() {
            EditOutcome::Saved(result) => {
                assert_eq!(result.text, "v2");
                assert_eq!(result.position, Some(7));
                assert_eq!(result.created_id, None);
            }
            EditOutcome::Cancelled => panic!("expected saved outcome"),
        }
    }
}
