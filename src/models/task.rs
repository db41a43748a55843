use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque task identifier, `task-<millis>-<suffix>` for tasks created here
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// Timestamp-prefixed id with a random suffix so that two tasks created in
    /// the same millisecond still get distinct ids.
    pub fn generate() -> Self {
        let millis = jiff::Timestamp::now().as_millisecond();
        let suffix = Uuid::new_v4().simple().to_string();
        TaskId(format!("task-{}-{}", millis, &suffix[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        TaskId(value.to_string())
    }
}

/// One of the three fixed board lanes, in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    ToDo,
    InProgress,
    Done,
}

impl Column {
    pub const ALL: [Column; 3] = [Column::ToDo, Column::InProgress, Column::Done];

    /// Label shown on the board; also the persisted status value and the
    /// drop-target id of the lane.
    pub fn label(self) -> &'static str {
        match self {
            Column::ToDo => "To Do",
            Column::InProgress => "In Progress",
            Column::Done => "Done",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown column '{0}'. Expected one of: To Do, In Progress, Done")]
pub struct UnknownColumn(pub String);

impl FromStr for Column {
    type Err = UnknownColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Column::ToDo),
            "inprogress" => Ok(Column::InProgress),
            "done" => Ok(Column::Done),
            _ => Err(UnknownColumn(s.to_string())),
        }
    }
}

/// Persisted status of a task.
///
/// Documents written by other clients may carry a status we do not know.
/// Those are kept verbatim in `Unrecognized` so they survive a round trip,
/// but they never appear on the board.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
    #[serde(untagged)]
    Unrecognized(String),
}

impl TaskStatus {
    pub fn column(&self) -> Option<Column> {
        match self {
            TaskStatus::ToDo => Some(Column::ToDo),
            TaskStatus::InProgress => Some(Column::InProgress),
            TaskStatus::Done => Some(Column::Done),
            TaskStatus::Unrecognized(_) => None,
        }
    }
}

impl From<Column> for TaskStatus {
    fn from(column: Column) -> Self {
        match column {
            Column::ToDo => TaskStatus::ToDo,
            Column::InProgress => TaskStatus::InProgress,
            Column::Done => TaskStatus::Done,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Unrecognized(raw) => f.write_str(raw),
            known => match known.column() {
                Some(column) => f.write_str(column.label()),
                None => Ok(()),
            },
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Identifier, unique within its project
    pub id: TaskId,
    /// What needs doing
    pub content: String,
    /// Free-form assignee, usually an email; never validated
    #[serde(rename = "assignedTo")]
    pub assigned_to: String,
    /// Lane the task lives in
    pub status: TaskStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_uses_board_labels_on_the_wire() {
        let task = Task {
            id: TaskId::from("task-1"),
            content: String::from("Write docs"),
            assigned_to: String::from("ana@example.com"),
            status: TaskStatus::InProgress,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["status"], "In Progress");
        assert_eq!(json["assignedTo"], "ana@example.com");
        assert_eq!(json["id"], "task-1");
    }

    #[test]
    fn test_unknown_status_is_kept_verbatim() {
        let json = r#"{"id":"task-9","content":"x","assignedTo":"y","status":"Blocked"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, TaskStatus::Unrecognized(String::from("Blocked")));
        assert_eq!(task.status.column(), None);

        let back = serde_json::to_value(&task).unwrap();
        assert_eq!(back["status"], "Blocked");
    }

    #[test]
    fn test_column_parses_labels_and_aliases() {
        assert_eq!("To Do".parse::<Column>().unwrap(), Column::ToDo);
        assert_eq!("todo".parse::<Column>().unwrap(), Column::ToDo);
        assert_eq!("in-progress".parse::<Column>().unwrap(), Column::InProgress);
        assert_eq!("In Progress".parse::<Column>().unwrap(), Column::InProgress);
        assert_eq!("DONE".parse::<Column>().unwrap(), Column::Done);
        assert!("Blocked".parse::<Column>().is_err());
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = TaskId::generate();
        let b = TaskId::generate();
        assert!(a.as_str().starts_with("task-"));
        assert_ne!(a, b);
    }
}
