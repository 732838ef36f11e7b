//! Core domain logic for the memo app.
//! This crate is the single source of truth for note invariants; UI layers
//! only render what the screen controllers push and feed user input back.

pub mod app;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod screen;

pub use app::{AppError, MemoApp};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::note::{Note, NoteId, NoteValidationError};
pub use repo::note_store::{NoteStore, SqliteNoteStore};
pub use repo::{Persistable, RepoError, RepoResult};
pub use screen::edit_screen::{EditPhase, EditScreen, EditScreenError, InlineEditLauncher};
pub use screen::list_model::{ListModelError, NoteListModel};
pub use screen::list_screen::{ListScreen, ListScreenError};
pub use screen::{
    EditLauncher, EditOutcome, EditRenderer, EditRequest, EditResult, ListRenderer, NoopRenderer,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
