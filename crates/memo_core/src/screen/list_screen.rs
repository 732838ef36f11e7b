//! List screen controller.
//!
//! # Responsibility
//! - Load all notes into the view-model on activation.
//! - Issue edit/create requests and patch the view-model with the reply.
//!
//! # Invariants
//! - At most one edit request is pending; each gets exactly one reply.
//! - The view-model is patched in place, never reloaded after an edit.
//! - `ids[p]` names the note displayed at position `p`.

use crate::model::note::NoteId;
use crate::repo::note_store::NoteStore;
use crate::repo::RepoError;
use crate::screen::edit_screen::EditScreenError;
use crate::screen::list_model::{ListModelError, NoteListModel};
use crate::screen::{EditLauncher, EditOutcome, EditRequest, ListRenderer};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ListScreenError {
    /// No note is displayed at the requested position.
    PositionOutOfRange { position: usize, len: usize },
    /// The row exists but its note id is unknown to this screen.
    UnknownNote(usize),
    /// An edit reply arrived without a matching request.
    NoPendingEdit,
    /// A new request was issued while another is still pending.
    EditInProgress,
    /// An update reply carried no list position.
    MissingPosition,
    Model(ListModelError),
    Repo(RepoError),
    Edit(EditScreenError),
}

impl Display for ListScreenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PositionOutOfRange { position, len } => {
                write!(f, "no note at position {position} (list has {len})")
            }
            Self::UnknownNote(position) => write!(f, "note id unknown at position {position}"),
            Self::NoPendingEdit => write!(f, "no edit request is pending"),
            Self::EditInProgress => write!(f, "an edit request is already pending"),
            Self::MissingPosition => write!(f, "update reply is missing its list position"),
            Self::Model(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Edit(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ListScreenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Model(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Edit(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ListModelError> for ListScreenError {
    fn from(value: ListModelError) -> Self {
        Self::Model(value)
    }
}

impl From<RepoError> for ListScreenError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<EditScreenError> for ListScreenError {
    fn from(value: EditScreenError) -> Self {
        Self::Edit(value)
    }
}

#[derive(Debug)]
pub struct ListScreen {
    model: NoteListModel,
    ids: Vec<Option<NoteId>>,
    pending: Option<EditRequest>,
}

impl ListScreen {
    /// Loads every note from `store` and renders the list.
    pub fn activate<S, R>(store: &S, renderer: &mut R) -> Result<Self, ListScreenError>
    where
        S: NoteStore + ?Sized,
        R: ListRenderer + ?Sized,
    {
        let notes = store.find_all()?;
        let mut model = NoteListModel::new();
        let mut ids = Vec::with_capacity(notes.len());
        model.load(notes.into_iter().map(|note| {
            ids.push(Some(note.id));
            note.text
        }));

        let screen = Self {
            model,
            ids,
            pending: None,
        };
        renderer.render_list(screen.model.items());
        debug!(
            "event=list_activate module=screen status=ok count={}",
            screen.model.len()
        );
        Ok(screen)
    }

    /// Builds the request for editing the note shown at `position`.
    pub fn begin_edit(&mut self, position: usize) -> Result<EditRequest, ListScreenError> {
        self.ensure_idle()?;
        let id = match self.ids.get(position) {
            Some(Some(id)) => id.clone(),
            Some(None) => return Err(ListScreenError::UnknownNote(position)),
            None => {
                return Err(ListScreenError::PositionOutOfRange {
                    position,
                    len: self.model.len(),
                })
            }
        };

        let request = EditRequest::edit(id, position);
        self.pending = Some(request.clone());
        Ok(request)
    }

    /// Builds the request for creating a new note.
    pub fn begin_create(&mut self) -> Result<EditRequest, ListScreenError> {
        self.ensure_idle()?;
        let request = EditRequest::create();
        self.pending = Some(request.clone());
        Ok(request)
    }

    /// Applies the single reply to the pending request and re-renders.
    pub fn complete_edit<R>(
        &mut self,
        outcome: EditOutcome,
        renderer: &mut R,
    ) -> Result<(), ListScreenError>
    where
        R: ListRenderer + ?Sized,
    {
        let request = self.pending.take().ok_or(ListScreenError::NoPendingEdit)?;

        let result = match outcome {
            EditOutcome::Cancelled => {
                debug!("event=list_complete module=screen status=cancelled");
                return Ok(());
            }
            EditOutcome::Saved(result) => result,
        };

        if request.is_create() {
            self.model.append(result.text);
            self.ids.push(result.created_id);
        } else {
            let position = result
                .position
                .or(request.position)
                .ok_or(ListScreenError::MissingPosition)?;
            self.model.replace_at(result.text, position)?;
        }

        renderer.render_list(self.model.items());
        info!(
            "event=list_complete module=screen status=ok count={}",
            self.model.len()
        );
        Ok(())
    }

    /// Drops the pending request without touching the list.
    pub fn abandon_edit(&mut self) {
        self.pending = None;
    }

    /// Runs the edit flow for the note at `position` through `launcher`.
    pub fn open_note<L, R>(
        &mut self,
        position: usize,
        launcher: &mut L,
        renderer: &mut R,
    ) -> Result<EditOutcome, ListScreenError>
    where
        L: EditLauncher + ?Sized,
        ListScreenError: From<L::Error>,
        R: ListRenderer + ?Sized,
    {
        let request = self.begin_edit(position)?;
        self.run_flow(request, launcher, renderer)
    }

    /// Runs the create flow through `launcher`.
    pub fn create_note<L, R>(
        &mut self,
        launcher: &mut L,
        renderer: &mut R,
    ) -> Result<EditOutcome, ListScreenError>
    where
        L: EditLauncher + ?Sized,
        ListScreenError: From<L::Error>,
        R: ListRenderer + ?Sized,
    {
        let request = self.begin_create()?;
        self.run_flow(request, launcher, renderer)
    }

    pub fn items(&self) -> &[String] {
        self.model.items()
    }

    pub fn note_id_at(&self, position: usize) -> Option<&NoteId> {
        self.ids.get(position).and_then(Option::as_ref)
    }

    pub fn pending_edit(&self) -> Option<&EditRequest> {
        self.pending.as_ref()
    }

    fn run_flow<L, R>(
        &mut self,
        request: EditRequest,
        launcher: &mut L,
        renderer: &mut R,
    ) -> Result<EditOutcome, ListScreenError>
    where
        L: EditLauncher + ?Sized,
        ListScreenError: From<L::Error>,
        R: ListRenderer + ?Sized,
    {
        let outcome = match launcher.launch(request) {
            Ok(outcome) => outcome,
            Err(err) => {
                self.abandon_edit();
                return Err(err.into());
            }
        };
        self.complete_edit(outcome.clone(), renderer)?;
        Ok(outcome)
    }

    fn ensure_idle(&self) -> Result<(), ListScreenError> {
        if self.pending.is_some() {
            Err(ListScreenError::EditInProgress)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ListScreen, ListScreenError};
    use crate::db::open_db_in_memory;
    use crate::model::note::NoteId;
    use crate::repo::note_store::{NoteStore, SqliteNoteStore};
    use crate::screen::{EditOutcome, EditResult, ListRenderer, NoopRenderer};

    #[derive(Default)]
    struct RecordingRenderer {
        frames: Vec<Vec<String>>,
    }

    impl ListRenderer for RecordingRenderer {
        fn render_list(&mut self, items: &[String]) {
            self.frames.push(items.to_vec());
        }
    }

    fn saved(text: &str, position: Option<usize>, created_id: Option<NoteId>) -> EditOutcome {
        EditOutcome::Saved(EditResult {
            text: text.to_string(),
            position,
            created_id,
        })
    }

    #[test]
    fn activate_on_empty_store_renders_empty_list() {
        let mut conn = open_db_in_memory().unwrap();
        let store = SqliteNoteStore::new(&mut conn);
        let mut renderer = RecordingRenderer::default();

        let screen = ListScreen::activate(&store, &mut renderer).unwrap();
        assert!(screen.items().is_empty());
        assert_eq!(renderer.frames, vec![Vec::<String>::new()]);
    }

    #[test]
    fn begin_edit_carries_id_and_position() {
        let mut conn = open_db_in_memory().unwrap();
        let mut store = SqliteNoteStore::new(&mut conn);
        store.create("a").unwrap();
        let second = store.create("b").unwrap();

        let mut screen = ListScreen::activate(&store, &mut NoopRenderer).unwrap();
        let request = screen.begin_edit(1).unwrap();
        assert_eq!(request.id, Some(second.id));
        assert_eq!(request.position, Some(1));
    }

    #[test]
    fn begin_edit_out_of_range_fails() {
        let mut conn = open_db_in_memory().unwrap();
        let store = SqliteNoteStore::new(&mut conn);
        let mut screen = ListScreen::activate(&store, &mut NoopRenderer).unwrap();

        assert!(matches!(
            screen.begin_edit(0),
            Err(ListScreenError::PositionOutOfRange { position: 0, len: 0 })
        ));
        assert!(screen.pending_edit().is_none());
    }

    #[test]
    fn cancelled_reply_leaves_list_untouched() {
        let mut conn = open_db_in_memory().unwrap();
        let mut store = SqliteNoteStore::new(&mut conn);
        store.create("a").unwrap();
        let mut screen = ListScreen::activate(&store, &mut NoopRenderer).unwrap();
        let mut renderer = RecordingRenderer::default();

        screen.begin_edit(0).unwrap();
        screen
            .complete_edit(EditOutcome::Cancelled, &mut renderer)
            .unwrap();
        assert_eq!(screen.items(), ["a"]);
        assert!(renderer.frames.is_empty());
        assert!(screen.pending_edit().is_none());
    }

    #[test]
    fn reply_without_request_is_rejected() {
        let mut conn = open_db_in_memory().unwrap();
        let store = SqliteNoteStore::new(&mut conn);
        let mut screen = ListScreen::activate(&store, &mut NoopRenderer).unwrap();

        let err = screen
            .complete_edit(saved("x", None, None), &mut NoopRenderer)
            .unwrap_err();
        assert!(matches!(err, ListScreenError::NoPendingEdit));
    }

    #[test]
    fn second_request_while_pending_is_rejected() {
        let mut conn = open_db_in_memory().unwrap();
        let store = SqliteNoteStore::new(&mut conn);
        let mut screen = ListScreen::activate(&store, &mut NoopRenderer).unwrap();

        screen.begin_create().unwrap();
        assert!(matches!(
            screen.begin_create(),
            Err(ListScreenError::EditInProgress)
        ));
    }

    #[test]
    fn created_note_is_appended_and_editable() {
        let mut conn = open_db_in_memory().unwrap();
        let store = SqliteNoteStore::new(&mut conn);
        let mut screen = ListScreen::activate(&store, &mut NoopRenderer).unwrap();

        screen.begin_create().unwrap();
        screen
            .complete_edit(
                saved("fresh", None, Some(NoteId::from("new-id"))),
                &mut NoopRenderer,
            )
            .unwrap();
        assert_eq!(screen.items(), ["fresh"]);

        let request = screen.begin_edit(0).unwrap();
        assert_eq!(request.id, Some(NoteId::from("new-id")));
    }
}
