use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::kanban_board::{DropPayload, KanbanBoard};
use crate::store::TaskStore;
use crate::task::NewTask;

#[derive(Debug, Parser)]
#[command(name = "taskboard", version, about = "Three-lane task board for the terminal")]
pub struct Cli {
    /// Task list file, overrides `store_path` from the config
    #[arg(long, global = true, env = "TASKBOARD_STORE")]
    pub store: Option<PathBuf>,

    /// Config file (default: <config dir>/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Open the interactive board (default)
    Tui,
    /// Add a task to the to-do lane and print its id
    Add {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Due date as DD/MM/YYYY
        #[arg(long, default_value = "")]
        due: String,
    },
    /// Print the board
    List {
        /// Print the stored records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Drop a task onto a lane (to-do, in-progress, done)
    Move { id: String, lane: String },
    /// Delete a task by id
    Delete { id: String },
}

/// Runs one non-interactive command against `board`, writing to `out`.
pub fn run_headless<S: TaskStore>(
    board: &mut KanbanBoard<S>,
    command: Commands,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Commands::Tui => {}
        Commands::Add {
            title,
            description,
            due,
        } => {
            let id = board.add(NewTask::new(title, description, due));
            writeln!(out, "{id}")?;
        }
        Commands::List { json } => {
            if json {
                let tasks = board.store().load();
                writeln!(out, "{}", serde_json::to_string_pretty(&tasks)?)?;
            } else {
                write_board(board, out)?;
            }
        }
        Commands::Move { id, lane } => {
            board.drop_task(DropPayload::new(id, &lane)?);
        }
        Commands::Delete { id } => {
            board.delete(id);
        }
    }
    if let Some(err) = board.last_error() {
        writeln!(out, "warning: {err}")?;
    }
    Ok(())
}

fn write_board<S: TaskStore>(board: &KanbanBoard<S>, out: &mut impl Write) -> Result<()> {
    for lane in &board.view().lanes {
        writeln!(out, "{} ({})", lane.status.display_name(), lane.cards.len())?;
        for card in &lane.cards {
            write!(out, "  {}  {}", card.id, card.title)?;
            if let Some(label) = card.emphasis.label() {
                write!(out, "  [{label}]")?;
            }
            if !card.due_date.is_empty() {
                write!(out, "  due {}", card.due_date)?;
            }
            writeln!(out)?;
            if !card.description.is_empty() {
                writeln!(out, "      {}", card.description)?;
            }
        }
    }
    Ok(())
}
