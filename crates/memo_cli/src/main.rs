//! Command-line driver for memo core.
//!
//! # Responsibility
//! - Run the list/edit screen flow against a database file from a shell.
//! - Keep output deterministic for quick local sanity checks.

use clap::{Parser, Subcommand};
use log::{error, info};
use memo_core::{
    CoreConfig, EditOutcome, InlineEditLauncher, ListRenderer, ListScreen, MemoApp, NoopRenderer,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "memo")]
#[command(about = "Add, edit and list memo notes", long_about = None)]
#[command(version)]
struct Cli {
    /// Database file; defaults to MEMO_DB_PATH or the temp directory.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every note with its list position.
    List,
    /// Create a new note.
    Add { text: Vec<String> },
    /// Replace the text of the note at a list position.
    Edit { position: usize, text: Vec<String> },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Add { .. } => "add",
            Self::Edit { .. } => "edit",
        }
    }
}

/// Prints each rendered frame as numbered rows.
struct StdoutRenderer;

impl ListRenderer for StdoutRenderer {
    fn render_list(&mut self, items: &[String]) {
        if items.is_empty() {
            println!("(no notes)");
        }
        for (position, text) in items.iter().enumerate() {
            println!("{position:>3}  {}", text.replace('\n', " "));
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("memo: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = CoreConfig::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(log_dir) = cli.log_dir {
        config = config.with_log_dir(log_dir);
    }
    if let Some(level) = cli.log_level {
        config = config.with_log_level(level);
    }

    let mut app = MemoApp::start(config)?;
    let command = cli.command.name();
    info!("event=cli_command module=cli status=start command={command}");
    let result: Result<(), Box<dyn Error>> = match cli.command {
        Command::List => app.open_list(&mut StdoutRenderer).map(|_| ()).map_err(Into::into),
        Command::Add { text } => submit(&mut app, None, text.join(" ")),
        Command::Edit { position, text } => submit(&mut app, Some(position), text.join(" ")),
    };
    match &result {
        Ok(()) => info!("event=cli_command module=cli status=ok command={command}"),
        Err(err) => error!("event=cli_command module=cli status=error command={command} error={err}"),
    }
    app.shutdown()?;
    result
}

fn submit(app: &mut MemoApp, position: Option<usize>, text: String) -> Result<(), Box<dyn Error>> {
    let mut list = ListScreen::activate(&app.store(), &mut NoopRenderer)?;
    let mut store = app.store();
    let mut launcher = InlineEditLauncher::new(&mut store, |_: &str| text.clone());

    let outcome = match position {
        Some(position) => list.open_note(position, &mut launcher, &mut StdoutRenderer)?,
        None => list.create_note(&mut launcher, &mut StdoutRenderer)?,
    };
    if outcome == EditOutcome::Cancelled {
        println!("nothing saved: text is blank");
    }
    Ok(())
}
