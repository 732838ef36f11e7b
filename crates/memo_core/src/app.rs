//! Application context owning the database handle.
//!
//! # Responsibility
//! - Initialize logging and open the database once at startup.
//! - Hand the connection to stores and screens explicitly.
//! - Close the connection on shutdown.
//!
//! # Invariants
//! - No store or screen operation runs before `MemoApp::start` succeeds.
//! - The connection is owned here; stores only borrow it per operation.

use crate::config::CoreConfig;
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::logging::{init_logging, LoggingConfig, LoggingError};
use crate::repo::note_store::SqliteNoteStore;
use crate::screen::edit_screen::{EditScreen, EditScreenError};
use crate::screen::list_screen::{ListScreen, ListScreenError};
use crate::screen::{EditOutcome, EditRenderer, EditRequest, ListRenderer};
use log::{error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum AppError {
    Logging(LoggingError),
    Db(DbError),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<LoggingError> for AppError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<DbError> for AppError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub struct MemoApp {
    conn: Connection,
    config: Option<CoreConfig>,
}

impl MemoApp {
    /// Starts logging (when a log directory is configured) and opens the
    /// database file.
    pub fn start(config: CoreConfig) -> Result<Self, AppError> {
        if let Some(log_dir) = config.log_dir.as_ref() {
            init_logging(&LoggingConfig::new(config.log_level.as_str(), log_dir))?;
        }

        let conn = open_db(&config.db_path)?;
        info!("event=app_ready module=app status=ok mode=file");
        Ok(Self {
            conn,
            config: Some(config),
        })
    }

    /// Starts against a private in-memory database without touching logging.
    pub fn start_in_memory() -> Result<Self, AppError> {
        let conn = open_db_in_memory()?;
        info!("event=app_ready module=app status=ok mode=memory");
        Ok(Self { conn, config: None })
    }

    /// Configuration used at start; `None` for in-memory apps.
    pub fn config(&self) -> Option<&CoreConfig> {
        self.config.as_ref()
    }

    /// Borrows the note store for one or more operations.
    pub fn store(&mut self) -> SqliteNoteStore<'_> {
        SqliteNoteStore::new(&mut self.conn)
    }

    /// Activates the list screen from current store contents.
    pub fn open_list<R>(&mut self, renderer: &mut R) -> Result<ListScreen, ListScreenError>
    where
        R: ListRenderer + ?Sized,
    {
        ListScreen::activate(&self.store(), renderer)
    }

    /// Activates the edit screen for `request`.
    pub fn open_editor<R>(
        &mut self,
        request: EditRequest,
        renderer: &mut R,
    ) -> Result<EditScreen, EditScreenError>
    where
        R: EditRenderer + ?Sized,
    {
        EditScreen::activate(&self.store(), request, renderer)
    }

    /// Finishes `screen`, persisting through this app's store.
    pub fn finish_editor(&mut self, screen: &mut EditScreen) -> Result<EditOutcome, EditScreenError> {
        screen.finish(&mut self.store())
    }

    /// Closes the database connection.
    pub fn shutdown(self) -> Result<(), AppError> {
        if let Err((_, err)) = self.conn.close() {
            error!("event=app_shutdown module=app status=error error={err}");
            return Err(err.into());
        }
        info!("event=app_shutdown module=app status=ok");
        Ok(())
    }
}
