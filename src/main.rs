use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use taskboard::app::App;
use taskboard::cli::{self, Cli, Commands};
use taskboard::config::{Config, Paths};
use taskboard::ui::run_app;
use taskboard::{JsonFileStore, KanbanBoard};

fn init_logging(config: &Config) -> Result<()> {
    let path = config.resolve_log_file()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    // stdout belongs to the board, so logs only go to the file.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => Paths::config_file()?,
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config {}", config_path.display()))?;
    init_logging(&config)?;

    let store_path = config.resolve_store_path(args.store.as_deref())?;
    info!(store = %store_path.display(), "taskboard starting");
    let mut board = KanbanBoard::new(JsonFileStore::new(store_path));

    match args.command {
        None | Some(Commands::Tui) => run_tui(board),
        Some(command) => {
            let stdout = io::stdout();
            cli::run_headless(&mut board, command, &mut stdout.lock())?;
            Ok(())
        }
    }
}

fn run_tui(board: KanbanBoard<JsonFileStore>) -> Result<()> {
    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(board);
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result.context("terminal event loop failed")
}
