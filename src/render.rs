//! Projection of the stored task list onto the three lanes.
//!
//! Nothing here touches the store. Group membership and emphasis are derived
//! from scratch on every call.

use chrono::NaiveDate;

use crate::task::{Status, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    None,
    DueToday,
    Overdue,
}

impl Emphasis {
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Emphasis::None => None,
            Emphasis::DueToday => Some("due today"),
            Emphasis::Overdue => Some("overdue"),
        }
    }
}

/// Only open tasks with a due date are emphasized, compared by calendar day.
pub fn emphasis(task: &Task, today: NaiveDate) -> Emphasis {
    if task.status == Status::Done {
        return Emphasis::None;
    }
    match task.due_date() {
        Some(due) if due == today => Emphasis::DueToday,
        Some(due) if due < today => Emphasis::Overdue,
        _ => Emphasis::None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub emphasis: Emphasis,
    pub draggable: bool,
}

impl Card {
    fn from_task(task: &Task, today: NaiveDate) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date.clone(),
            emphasis: emphasis(task, today),
            draggable: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lane {
    pub status: Status,
    pub cards: Vec<Card>,
}

impl Lane {
    /// Lane identifier, identical to the status value it accepts on drop.
    pub fn id(&self) -> &str {
        self.status.as_str()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub lanes: [Lane; 3],
}

impl BoardView {
    pub fn card(&self, id: &str) -> Option<(&Lane, &Card)> {
        self.lanes
            .iter()
            .find_map(|lane| lane.cards.iter().find(|c| c.id == id).map(|c| (lane, c)))
    }

    pub fn card_count(&self) -> usize {
        self.lanes.iter().map(|lane| lane.cards.len()).sum()
    }
}

pub fn render(tasks: &[Task], today: NaiveDate) -> BoardView {
    let mut lanes = Status::LANES.map(|status| Lane {
        status,
        cards: Vec::new(),
    });

    for task in tasks {
        // Unrecognized statuses have no lane and stay out of view.
        if let Some(idx) = task.status.lane_index() {
            lanes[idx].cards.push(Card::from_task(task, today));
        }
    }

    for card in lanes.iter_mut().flat_map(|lane| lane.cards.iter_mut()) {
        card.draggable = true;
    }

    BoardView { lanes }
}
