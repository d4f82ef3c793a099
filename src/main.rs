mod app;
mod board;
mod config;
mod controller;
mod dnd;
mod input;
mod ui;

use std::env;
use std::fs::File;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use crossterm::event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use board::sample::sample_board;
use board::storage::{board_to_toml, load_board, StorageError};
use config::{load_settings, Settings};

#[derive(Parser)]
#[command(name = "tack", about = "A drag-and-drop Kanban board for the terminal")]
struct Cli {
    /// Board file to open (TOML). Without one, a demo board is shown.
    #[arg(short, long)]
    board: Option<PathBuf>,

    /// Settings file (TOML). Missing keys take their defaults.
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Write logs to this file (also read from TACK_LOG_FILE). Level comes from RUST_LOG.
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a board file and print its columns
    Check {
        /// Board file to check
        #[arg(short, long)]
        board: PathBuf,
    },
    /// Print the demo board as TOML
    Sample,
}

fn main() {
    // Install color_eyre for unexpected panics/errors (developer bugs).
    let _ = color_eyre::install();
    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| env::var_os("TACK_LOG_FILE").map(PathBuf::from));
    if let Some(path) = log_file {
        if let Err(e) = init_logging(&path) {
            eprintln!("warning: cannot open log file {}: {e}", path.display());
        }
    }

    let result = match cli.command {
        Some(Command::Check { board }) => cmd_check(&board),
        Some(Command::Sample) => cmd_sample(),
        None => cmd_tui(cli.board.as_deref(), cli.settings.as_deref()),
    };

    if let Err(e) = result {
        print_user_error(&e);
        std::process::exit(1);
    }
}

/// Send tracing output to `path`. The terminal belongs to the TUI, so there
/// is no log output at all without a file.
fn init_logging(path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Print a user-friendly error message, with actionable hints for known error types.
fn print_user_error(error: &color_eyre::Report) {
    if let Some(storage_err) = error.downcast_ref::<StorageError>() {
        match storage_err {
            StorageError::NotFound(path) => {
                eprintln!("error: file not found: {}", path.display());
                eprintln!("  Run `tack sample > board.toml` for a board to start from.");
            }
            StorageError::TomlDe(e) => {
                eprintln!("error: file has invalid TOML syntax.");
                eprintln!("  {e}");
            }
            StorageError::TomlSer(e) => {
                eprintln!("error: failed to write the board as TOML.");
                eprintln!("  {e}");
            }
            StorageError::InvalidBoard(e) => {
                eprintln!("error: the board is not valid: {e}");
                eprintln!("  Card and column ids must be non-empty and unique across the board.");
            }
            StorageError::Io(e) => {
                eprintln!("error: could not read the file.");
                eprintln!("  {e}");
            }
        }
        return;
    }

    eprintln!("error: {error:#}");
}

fn cmd_check(path: &Path) -> color_eyre::Result<()> {
    let board = load_board(path)
        .inspect_err(|e| warn!(path = %path.display(), error = %e, "board rejected"))
        .wrap_err_with(|| format!("checking {}", path.display()))?;
    println!(
        "{}: {} columns, {} cards",
        path.display(),
        board.columns.len(),
        board.card_count()
    );
    for column in &board.columns {
        println!("  {:<16} {} ({})", column.id, column.title, column.cards.len());
    }
    Ok(())
}

fn cmd_sample() -> color_eyre::Result<()> {
    print!("{}", board_to_toml(&sample_board())?);
    Ok(())
}

fn cmd_tui(board_path: Option<&Path>, settings_path: Option<&Path>) -> color_eyre::Result<()> {
    let board = match board_path {
        Some(path) => load_board(path)
            .inspect_err(|e| warn!(path = %path.display(), error = %e, "board rejected"))
            .wrap_err_with(|| format!("loading board {}", path.display()))?,
        None => sample_board(),
    };
    let settings = match settings_path {
        Some(path) => load_settings(path).wrap_err_with(|| format!("loading settings {}", path.display()))?,
        None => Settings::default(),
    };
    info!(
        columns = board.columns.len(),
        cards = board.card_count(),
        "board loaded"
    );

    let app = app::App::new(board, settings, ui::tilt_supported());
    let mut terminal = ratatui::init();
    let result = crossterm::execute!(stdout(), EnableMouseCapture, EnableFocusChange)
        .wrap_err("enabling mouse capture")
        .and_then(|()| app::run(&mut terminal, app));
    let _ = crossterm::execute!(stdout(), DisableMouseCapture, DisableFocusChange);
    ratatui::restore();
    result
}
