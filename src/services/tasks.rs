use thiserror::Error;
use tracing::info;

use crate::{
    models::task::{Column, Task, TaskId, TaskStatus},
    project_store::ProjectStore,
    services::board::{BoardUpdate, OpenBoardError, WriteOutcome, open_board, persist},
};

#[derive(Debug, Error)]
pub enum AddTaskError {
    #[error("Task content cannot be empty")]
    EmptyContent,

    #[error("Task must be assigned to someone")]
    EmptyAssignee,

    #[error(transparent)]
    Board(#[from] OpenBoardError),
}

pub struct AddTaskParameters {
    pub project_id: String,
    pub content: String,
    pub assigned_to: String,
    pub column: Column,
}

pub struct AddTaskResult {
    pub task: Task,
    pub update: BoardUpdate,
}

/// Appends a new task to the bottom of its lane and writes the whole board back.
pub fn add_task(
    store: &impl ProjectStore,
    parameters: AddTaskParameters,
) -> Result<AddTaskResult, AddTaskError> {
    let content = parameters.content.trim();
    if content.is_empty() {
        return Err(AddTaskError::EmptyContent);
    }
    let assigned_to = parameters.assigned_to.trim();
    if assigned_to.is_empty() {
        return Err(AddTaskError::EmptyAssignee);
    }

    let mut board = open_board(store, &parameters.project_id)?;

    let task = Task {
        id: TaskId::generate(),
        content: content.to_string(),
        assigned_to: assigned_to.to_string(),
        status: TaskStatus::from(parameters.column),
    };
    board.columns.push(parameters.column, task.clone());

    let write = persist(store, &board);
    if matches!(write, WriteOutcome::Persisted) {
        info!(project_id = %board.project_id, task_id = %task.id, "task added");
    }

    Ok(AddTaskResult {
        task,
        update: BoardUpdate { board, write },
    })
}
