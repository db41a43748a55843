use thiserror::Error;
use tracing::{error, info};

use crate::{
    board::{Columns, apply_move, build_columns, flatten, unrecognized_tasks},
    models::{project::Project, task::Task},
    project_store::{ProjectStore, ProjectStoreError},
};

/// A project as shown on screen
pub struct Board {
    pub project_id: String,
    pub name: String,
    pub columns: Columns,
    /// Tasks whose status is not a lane. Not shown, but written back untouched.
    pub unrecognized: Vec<Task>,
}

impl Board {
    pub fn from_project(project: Project) -> Self {
        Self {
            columns: build_columns(&project.tasks),
            unrecognized: unrecognized_tasks(&project.tasks),
            project_id: project.id,
            name: project.name,
        }
    }

    /// The list written back to the project document
    pub fn persisted_tasks(&self) -> Vec<Task> {
        let mut tasks = flatten(&self.columns);
        tasks.extend(self.unrecognized.iter().cloned());
        tasks
    }
}

/// What happened to the store after the board was updated locally
#[derive(Debug)]
pub enum WriteOutcome {
    Persisted,
    /// Nothing changed, nothing written
    Skipped,
    /// The local board is ahead of the store; not retried
    Failed(ProjectStoreError),
}

pub struct BoardUpdate {
    pub board: Board,
    pub write: WriteOutcome,
}

pub(crate) fn persist(store: &impl ProjectStore, board: &Board) -> WriteOutcome {
    match store.overwrite_tasks(&board.project_id, &board.persisted_tasks()) {
        Ok(()) => WriteOutcome::Persisted,
        Err(e) => {
            error!(project_id = %board.project_id, error = %e, "failed to persist board");
            WriteOutcome::Failed(e)
        }
    }
}

#[derive(Debug, Error)]
pub enum OpenBoardError {
    #[error("Project '{0}' not found")]
    ProjectNotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] ProjectStoreError),
}

pub fn open_board(store: &impl ProjectStore, project_id: &str) -> Result<Board, OpenBoardError> {
    let project = store
        .get_project(project_id)?
        .ok_or_else(|| OpenBoardError::ProjectNotFound(project_id.to_string()))?;
    Ok(Board::from_project(project))
}

pub struct MoveTaskParameters {
    pub project_id: String,
    /// The dragged task
    pub source_id: String,
    /// Task dropped on, or the name of an empty lane
    pub destination: String,
}

pub fn move_task(
    store: &impl ProjectStore,
    parameters: MoveTaskParameters,
) -> Result<BoardUpdate, OpenBoardError> {
    let mut board = open_board(store, &parameters.project_id)?;

    let moved = apply_move(&board.columns, &parameters.source_id, &parameters.destination);
    if moved == board.columns {
        return Ok(BoardUpdate {
            board,
            write: WriteOutcome::Skipped,
        });
    }

    board.columns = moved;
    let write = persist(store, &board);
    if matches!(write, WriteOutcome::Persisted) {
        info!(
            project_id = %board.project_id,
            task_id = %parameters.source_id,
            destination = %parameters.destination,
            "task moved"
        );
    }
    Ok(BoardUpdate { board, write })
}
