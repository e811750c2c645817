use chrono::{Local, NaiveDate};
use tracing::{error, info};

use crate::error::{BoardError, Result};
use crate::render::{render, BoardView};
use crate::store::TaskStore;
use crate::task::{NewTask, Status, Task};

/// A card released over a lane: which task, and the lane it landed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropPayload {
    pub task_id: String,
    pub target: Status,
}

impl DropPayload {
    /// Validates `lane_id` against the three lane identifiers.
    pub fn new(task_id: impl Into<String>, lane_id: &str) -> Result<Self> {
        let target = Status::from_lane_id(lane_id)
            .ok_or_else(|| BoardError::UnknownLane(lane_id.to_string()))?;
        Ok(Self {
            task_id: task_id.into(),
            target,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(Task),
    Delete { id: String },
    Drop(DropPayload),
}

/// Pure transition over the whole list. Unknown ids leave it unchanged.
pub fn apply(mut tasks: Vec<Task>, command: &Command) -> Vec<Task> {
    match command {
        Command::Add(task) => tasks.push(task.clone()),
        Command::Delete { id } => {
            if let Some(pos) = tasks.iter().position(|t| &t.id == id) {
                tasks.remove(pos);
            }
        }
        Command::Drop(payload) => {
            if let Some(task) = tasks.iter_mut().find(|t| t.id == payload.task_id) {
                task.status = payload.target.clone();
            }
        }
    }
    tasks
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Effect shell around [`apply`]: load, transition, persist, re-render.
pub struct KanbanBoard<S: TaskStore> {
    store: S,
    today: Box<dyn Fn() -> NaiveDate>,
    view: BoardView,
    last_error: Option<String>,
}

impl<S: TaskStore> KanbanBoard<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, local_today)
    }

    pub fn with_clock(store: S, today: impl Fn() -> NaiveDate + 'static) -> Self {
        let view = render(&store.load(), today());
        Self {
            store,
            today: Box::new(today),
            view,
            last_error: None,
        }
    }

    pub fn view(&self) -> &BoardView {
        &self.view
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Message from the most recent failed save, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn dispatch(&mut self, command: Command) -> &BoardView {
        info!(?command, "dispatch");
        let tasks = apply(self.store.load(), &command);
        match self.store.save(&tasks) {
            Ok(()) => self.last_error = None,
            Err(err) => {
                error!(error = %err, "failed to save tasks");
                self.last_error = Some(format!("save failed: {err}"));
            }
        }
        self.view = render(&tasks, (self.today)());
        &self.view
    }

    /// Adds a new to-do task and returns its id.
    pub fn add(&mut self, new_task: NewTask) -> String {
        let task = new_task.into_task();
        let id = task.id.clone();
        self.dispatch(Command::Add(task));
        id
    }

    pub fn delete(&mut self, id: impl Into<String>) -> &BoardView {
        self.dispatch(Command::Delete { id: id.into() })
    }

    pub fn drop_task(&mut self, payload: DropPayload) -> &BoardView {
        self.dispatch(Command::Drop(payload))
    }
}
