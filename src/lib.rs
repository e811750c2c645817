pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod kanban_board;
pub mod render;
pub mod store;
pub mod task;
pub mod ui;

pub use error::{BoardError, Result};
pub use kanban_board::{apply, Command, DropPayload, KanbanBoard};
pub use render::{render, BoardView, Emphasis};
pub use store::{JsonFileStore, MemoryStore, TaskStore};
pub use task::{NewTask, Status, Task};
