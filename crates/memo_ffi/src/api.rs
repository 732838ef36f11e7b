//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Map list/edit screen events from Dart onto the core controllers.
//! - Keep error semantics simple: every call returns an envelope.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - `app_start` must succeed before any list/edit call; earlier calls fail
//!   with a "not started" message.
//! - At most one list screen and one edit screen are active at a time.

use log::warn;
use memo_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CoreConfig, EditOutcome, EditRenderer, EditRequest, EditResult, EditScreen, ListRenderer,
    ListScreen, LoggingConfig, MemoApp, NoopRenderer, NoteId,
};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

static SESSION: Mutex<Option<Session>> = Mutex::new(None);

struct Session {
    app: MemoApp,
    list: Option<ListScreen>,
    editor: Option<EditScreen>,
}

/// Captures what a controller renders so it can be returned to Dart.
#[derive(Default)]
struct Snapshot {
    items: Vec<String>,
    text: String,
}

impl ListRenderer for Snapshot {
    fn render_list(&mut self, items: &[String]) {
        self.items = items.to_vec();
    }
}

impl EditRenderer for Snapshot {
    fn render_text(&mut self, text: &str) {
        self.text = text.to_string();
    }
}

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Idempotent for the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(&LoggingConfig::new(level, log_dir.trim())) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Opens the memo database for this process.
///
/// A blank `db_path` falls back to `MEMO_DB_PATH` / the default location.
/// Calling again while started is a no-op for a blank or identical path and
/// an error for a different one. Returns empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn app_start(db_path: String) -> String {
    let mut session = lock_session();
    let trimmed = db_path.trim();
    if let Some(active) = session.as_ref() {
        let active_path = active.app.config().map(|config| config.db_path.as_path());
        if trimmed.is_empty() || active_path == Some(Path::new(trimmed)) {
            return String::new();
        }
        warn!("event=app_start module=ffi status=rejected reason=already_started");
        return format!(
            "app_start failed: already started with `{}`; call app_shutdown first",
            active_path.map_or_else(|| "<memory>".to_string(), |path| path.display().to_string())
        );
    }

    let config = if trimmed.is_empty() {
        match CoreConfig::from_env() {
            Ok(config) => config,
            Err(err) => return format!("app_start failed: {err}"),
        }
    } else {
        CoreConfig::new(trimmed)
    };

    match MemoApp::start(config) {
        Ok(app) => {
            *session = Some(Session {
                app,
                list: None,
                editor: None,
            });
            String::new()
        }
        Err(err) => format!("app_start failed: {err}"),
    }
}

/// Closes the database and drops screen state. Returns empty string on
/// success; shutting down a stopped app is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn app_shutdown() -> String {
    let Some(session) = lock_session().take() else {
        return String::new();
    };
    match session.app.shutdown() {
        Ok(()) => String::new(),
        Err(err) => format!("app_shutdown failed: {err}"),
    }
}

/// List screen state returned to Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResponse {
    pub ok: bool,
    /// Display text per row, in list order.
    pub items: Vec<String>,
    pub message: String,
}

impl ListResponse {
    fn success(items: Vec<String>) -> Self {
        Self {
            ok: true,
            items,
            message: String::new(),
        }
    }

    fn failure(message: String) -> Self {
        Self {
            ok: false,
            items: Vec::new(),
            message,
        }
    }
}

/// Navigation payload for opening the edit screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequestResponse {
    pub ok: bool,
    /// `None` opens the editor in create mode.
    pub note_id: Option<String>,
    pub position: Option<u32>,
    pub message: String,
}

impl EditRequestResponse {
    fn from_request(request: EditRequest) -> Self {
        Self {
            ok: true,
            note_id: request.id.map(NoteId::into_string),
            position: request.position.and_then(|p| u32::try_from(p).ok()),
            message: String::new(),
        }
    }

    fn failure(message: String) -> Self {
        Self {
            ok: false,
            note_id: None,
            position: None,
            message,
        }
    }
}

/// Editor state returned on activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorResponse {
    pub ok: bool,
    /// Pre-filled text; empty in create mode or when the note is gone.
    pub text: String,
    pub message: String,
}

/// Single reply of an edit flow, passed back into `list_complete_edit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditReply {
    pub ok: bool,
    /// `false` means the flow was cancelled (blank text) or failed.
    pub saved: bool,
    pub text: Option<String>,
    pub position: Option<u32>,
    pub created_id: Option<String>,
    pub message: String,
}

impl EditReply {
    fn from_outcome(outcome: EditOutcome) -> Self {
        match outcome {
            EditOutcome::Saved(result) => Self {
                ok: true,
                saved: true,
                text: Some(result.text),
                position: result.position.and_then(|p| u32::try_from(p).ok()),
                created_id: result.created_id.map(NoteId::into_string),
                message: "Saved.".to_string(),
            },
            EditOutcome::Cancelled => Self::cancelled("Nothing to save."),
        }
    }

    fn cancelled(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            saved: false,
            text: None,
            position: None,
            created_id: None,
            message: message.into(),
        }
    }

    fn failure(message: String) -> Self {
        Self {
            ok: false,
            ..Self::cancelled(message)
        }
    }

    fn into_outcome(self) -> EditOutcome {
        match (self.ok && self.saved, self.text) {
            (true, Some(text)) => EditOutcome::Saved(EditResult {
                text,
                position: self.position.map(|p| p as usize),
                created_id: self.created_id.map(NoteId::from),
            }),
            _ => EditOutcome::Cancelled,
        }
    }
}

/// Activates the list screen from the store.
#[flutter_rust_bridge::frb(sync)]
pub fn list_activate() -> ListResponse {
    with_session(ListResponse::failure, |session| {
        let mut snapshot = Snapshot::default();
        match session.app.open_list(&mut snapshot) {
            Ok(list) => {
                session.list = Some(list);
                ListResponse::success(snapshot.items)
            }
            Err(err) => ListResponse::failure(format!("list_activate failed: {err}")),
        }
    })
}

/// Requests editing the row at `position`.
#[flutter_rust_bridge::frb(sync)]
pub fn list_begin_edit(position: u32) -> EditRequestResponse {
    with_list(EditRequestResponse::failure, |list| {
        match list.begin_edit(position as usize) {
            Ok(request) => EditRequestResponse::from_request(request),
            Err(err) => EditRequestResponse::failure(format!("list_begin_edit failed: {err}")),
        }
    })
}

/// Requests creating a new note.
#[flutter_rust_bridge::frb(sync)]
pub fn list_begin_create() -> EditRequestResponse {
    with_list(EditRequestResponse::failure, |list| {
        match list.begin_create() {
            Ok(request) => EditRequestResponse::from_request(request),
            Err(err) => EditRequestResponse::failure(format!("list_begin_create failed: {err}")),
        }
    })
}

/// Applies an edit reply to the active list and returns the new rows.
#[flutter_rust_bridge::frb(sync)]
pub fn list_complete_edit(reply: EditReply) -> ListResponse {
    with_list(ListResponse::failure, |list| {
        match list.complete_edit(reply.into_outcome(), &mut NoopRenderer) {
            Ok(()) => ListResponse::success(list.items().to_vec()),
            Err(err) => ListResponse::failure(format!("list_complete_edit failed: {err}")),
        }
    })
}

/// Opens the edit screen; `note_id = None` means create.
///
/// A present but blank `note_id` is rejected rather than read as create.
#[flutter_rust_bridge::frb(sync)]
pub fn edit_activate(note_id: Option<String>, position: Option<u32>) -> EditorResponse {
    let failure = |message: String| EditorResponse {
        ok: false,
        text: String::new(),
        message,
    };
    let id = match note_id {
        None => None,
        Some(id) if id.trim().is_empty() => {
            return failure("edit_activate failed: note_id must not be blank".to_string())
        }
        Some(id) => Some(NoteId::from(id.trim())),
    };
    with_session(&failure, |session| {
        if session.editor.is_some() {
            warn!("event=edit_activate module=ffi status=replaced");
        }
        let request = EditRequest {
            id,
            position: position.map(|p| p as usize),
        };
        let mut snapshot = Snapshot::default();
        match session.app.open_editor(request, &mut snapshot) {
            Ok(editor) => {
                session.editor = Some(editor);
                EditorResponse {
                    ok: true,
                    text: snapshot.text,
                    message: String::new(),
                }
            }
            Err(err) => failure(format!("edit_activate failed: {err}")),
        }
    })
}

/// Finishes the active edit screen with the user's text.
///
/// Blank text cancels without touching the store. On a store failure the
/// editor stays open so the call can be retried.
#[flutter_rust_bridge::frb(sync)]
pub fn edit_finish(text: String) -> EditReply {
    with_session(EditReply::failure, |session| {
        let Some(mut editor) = session.editor.take() else {
            return EditReply::failure("edit_finish failed: no active editor".to_string());
        };

        let result = editor
            .set_text(text)
            .and_then(|()| session.app.finish_editor(&mut editor));
        match result {
            Ok(outcome) => EditReply::from_outcome(outcome),
            Err(err) => {
                session.editor = Some(editor);
                EditReply::failure(format!("edit_finish failed: {err}"))
            }
        }
    })
}

fn lock_session() -> MutexGuard<'static, Option<Session>> {
    SESSION.lock().unwrap_or_else(PoisonError::into_inner)
}

fn with_session<T>(
    failure: impl FnOnce(String) -> T,
    f: impl FnOnce(&mut Session) -> T,
) -> T {
    match lock_session().as_mut() {
        Some(session) => f(session),
        None => failure("app not started; call app_start first".to_string()),
    }
}

fn with_list<T>(
    failure: impl Fn(String) -> T,
    f: impl FnOnce(&mut ListScreen) -> T,
) -> T {
    with_session(&failure, |session| match session.list.as_mut() {
        Some(list) => f(list),
        None => failure("list screen not active; call list_activate first".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::{
        app_shutdown, app_start, core_version, edit_activate, edit_finish, init_logging,
        list_activate, list_begin_create, list_begin_edit, list_complete_edit, ping,
    };
    use std::sync::Mutex;

    static TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_relative_log_dir() {
        let error = init_logging("info".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/memo-logs".to_string());
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn calls_before_start_fail_with_message() {
        let _guard = TEST_LOCK.lock().unwrap_or_else(|err| err.into_inner());
        app_shutdown();

        let response = list_activate();
        assert!(!response.ok);
        assert!(response.message.contains("app_start"));
    }

    #[test]
    fn create_then_edit_round_trip_through_ffi() {
        let _guard = TEST_LOCK.lock().unwrap_or_else(|err| err.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("memo.sqlite3");
        assert_eq!(app_start(db_path.to_string_lossy().into_owned()), "");

        let list = list_activate();
        assert!(list.ok, "{}", list.message);
        assert!(list.items.is_empty());

        let request = list_begin_create();
        assert!(request.ok, "{}", request.message);
        assert_eq!(request.note_id, None);
        let editor = edit_activate(request.note_id, request.position);
        assert_eq!(editor.text, "");
        let reply = edit_finish("buy milk".to_string());
        assert!(reply.saved, "{}", reply.message);
        let list = list_complete_edit(reply);
        assert_eq!(list.items, vec!["buy milk".to_string()]);

        let request = list_begin_edit(0);
        assert!(request.ok, "{}", request.message);
        assert_eq!(request.position, Some(0));
        let editor = edit_activate(request.note_id, request.position);
        assert_eq!(editor.text, "buy milk");
        let reply = edit_finish("buy oat milk".to_string());
        assert_eq!(reply.position, Some(0));
        let list = list_complete_edit(reply);
        assert_eq!(list.items, vec!["buy oat milk".to_string()]);

        let request = list_begin_create();
        edit_activate(request.note_id, request.position);
        let reply = edit_finish("   ".to_string());
        assert!(reply.ok);
        assert!(!reply.saved);
        let list = list_complete_edit(reply);
        assert_eq!(list.items, vec!["buy oat milk".to_string()]);

        assert_eq!(app_shutdown(), "");
        assert_eq!(app_start(db_path.to_string_lossy().into_owned()), "");
        let list = list_activate();
        assert_eq!(list.items, vec!["buy oat milk".to_string()]);
        assert_eq!(app_shutdown(), "");
    }

    #[test]
    fn blank_note_id_is_rejected_instead_of_creating() {
        let _guard = TEST_LOCK.lock().unwrap_or_else(|err| err.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("memo.sqlite3");
        assert_eq!(app_start(db_path.to_string_lossy().into_owned()), "");

        let editor = edit_activate(Some("   ".to_string()), Some(0));
        assert!(!editor.ok);
        assert!(editor.message.contains("must not be blank"));
        let reply = edit_finish("should not be saved".to_string());
        assert!(!reply.ok);

        let list = list_activate();
        assert!(list.items.is_empty());
        assert_eq!(app_shutdown(), "");
    }

    #[test]
    fn restart_with_different_path_is_rejected_while_started() {
        let _guard = TEST_LOCK.lock().unwrap_or_else(|err| err.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.sqlite3");
        let second = dir.path().join("second.sqlite3");
        assert_eq!(app_start(first.to_string_lossy().into_owned()), "");

        assert_eq!(app_start(first.to_string_lossy().into_owned()), "");
        assert_eq!(app_start(String::new()), "");
        let error = app_start(second.to_string_lossy().into_owned());
        assert!(error.contains("already started"), "{error}");
        assert!(!second.exists());

        assert_eq!(app_shutdown(), "");
    }
}
