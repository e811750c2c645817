use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Text format of `dueDate`, day/month/year.
pub const DUE_DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Todo,
    InProgress,
    Done,
    /// A status string read from storage that is none of the lanes. Kept
    /// verbatim so it round-trips, never produced by this crate.
    Other(String),
}

impl Status {
    /// The three lanes, in board order.
    pub const LANES: [Status; 3] = [Status::Todo, Status::InProgress, Status::Done];

    pub fn as_str(&self) -> &str {
        match self {
            Status::Todo => "to-do",
            Status::InProgress => "in-progress",
            Status::Done => "done",
            Status::Other(s) => s,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Status::Todo => "To Do",
            Status::InProgress => "In Progress",
            Status::Done => "Done",
            Status::Other(s) => s,
        }
    }

    /// Parses a lane identifier. Only the three lane strings are accepted.
    pub fn from_lane_id(s: &str) -> Option<Self> {
        match s {
            "to-do" => Some(Status::Todo),
            "in-progress" => Some(Status::InProgress),
            "done" => Some(Status::Done),
            _ => None,
        }
    }

    /// Lane position on the board, `None` for unrecognized statuses.
    pub fn lane_index(&self) -> Option<usize> {
        Self::LANES.iter().position(|lane| lane == self)
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        Status::from_lane_id(&s).unwrap_or(Status::Other(s))
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        match status {
            Status::Other(s) => s,
            lane => lane.as_str().to_string(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: String,
    pub status: Status,
}

impl Task {
    /// Parsed due date. Empty or malformed text yields `None`.
    pub fn due_date(&self) -> Option<NaiveDate> {
        parse_due_date(&self.due_date)
    }
}

pub fn parse_due_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(text, DUE_DATE_FORMAT).ok()
}

/// Form input for a task that does not exist yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_date: String,
}

impl NewTask {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            due_date: due_date.into(),
        }
    }

    /// Builds the stored record with a fresh id. Title and description are
    /// trimmed; an empty title is accepted.
    pub fn into_task(self) -> Task {
        Task {
            id: Uuid::new_v4().to_string(),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            due_date: self.due_date,
            status: Status::Todo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_survives_serde() {
        let json = r#"{"id":"x","title":"t","description":"","dueDate":"","status":"blocked"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, Status::Other("blocked".into()));
        assert_eq!(task.status.lane_index(), None);
        let back = serde_json::to_string(&task).unwrap();
        assert_eq!(back, json);
    }

    #[test]
    fn lane_statuses_use_hyphenated_strings() {
        let task = Task {
            id: "1".into(),
            title: "t".into(),
            description: String::new(),
            due_date: String::new(),
            status: Status::InProgress,
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["status"], "in-progress");
        assert_eq!(value["dueDate"], "");
    }

    #[test]
    fn missing_optional_fields_default_to_empty() {
        let task: Task = serde_json::from_str(r#"{"id":"a","title":"b","status":"done"}"#).unwrap();
        assert_eq!(task.description, "");
        assert_eq!(task.due_date, "");
        assert_eq!(task.status, Status::Done);
    }

    #[test]
    fn due_date_is_day_month_year() {
        assert_eq!(
            parse_due_date("05/06/2024"),
            NaiveDate::from_ymd_opt(2024, 6, 5)
        );
        assert_eq!(parse_due_date(""), None);
        assert_eq!(parse_due_date("2024-06-05"), None);
        assert_eq!(parse_due_date("31/02/2024"), None);
    }

    #[test]
    fn new_task_trims_and_starts_in_todo() {
        let task = NewTask::new("  Write report ", " draft \n", "15/06/2024").into_task();
        assert_eq!(task.title, "Write report");
        assert_eq!(task.description, "draft");
        assert_eq!(task.due_date, "15/06/2024");
        assert_eq!(task.status, Status::Todo);
        assert!(Uuid::parse_str(&task.id).is_ok());
    }

    #[test]
    fn new_task_ids_are_unique() {
        let a = NewTask::default().into_task();
        let b = NewTask::default().into_task();
        assert_ne!(a.id, b.id);
        assert_eq!(a.title, "");
    }

    #[test]
    fn lane_index_follows_board_order() {
        assert_eq!(Status::Todo.lane_index(), Some(0));
        assert_eq!(Status::Done.lane_index(), Some(2));
        assert_eq!(Status::Other("x".into()).lane_index(), None);
        assert_eq!(Status::from_lane_id("todo"), None);
    }
}
