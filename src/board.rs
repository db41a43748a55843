//! Board reconciliation: the flat, persisted task list on one side and the
//! three ordered lanes shown on the board on the other.

use tracing::warn;

use crate::models::task::{Column, Task, TaskStatus};

/// Per-lane view of a project's tasks. Derived on every load, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Columns {
    to_do: Vec<Task>,
    in_progress: Vec<Task>,
    done: Vec<Task>,
}

impl Columns {
    pub fn get(&self, column: Column) -> &[Task] {
        match column {
            Column::ToDo => &self.to_do,
            Column::InProgress => &self.in_progress,
            Column::Done => &self.done,
        }
    }

    fn get_mut(&mut self, column: Column) -> &mut Vec<Task> {
        match column {
            Column::ToDo => &mut self.to_do,
            Column::InProgress => &mut self.in_progress,
            Column::Done => &mut self.done,
        }
    }

    /// Appends `task` to the bottom of `column`, rewriting its status to match.
    pub fn push(&mut self, column: Column, mut task: Task) {
        task.status = TaskStatus::from(column);
        self.get_mut(column).push(task);
    }

    /// Lanes in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Column, &[Task])> {
        Column::ALL.into_iter().map(move |column| (column, self.get(column)))
    }

    pub fn len(&self) -> usize {
        self.to_do.len() + self.in_progress.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn locate_task(&self, id: &str) -> Option<(Column, usize)> {
        Column::ALL.into_iter().find_map(|column| {
            self.get(column)
                .iter()
                .position(|task| task.id.as_str() == id)
                .map(|index| (column, index))
        })
    }

    /// Where a drop on `target` lands. An empty lane is addressed by its own
    /// name; anything else is addressed through one of its tasks.
    fn locate_drop_target(&self, target: &str) -> Option<(Column, usize)> {
        let target_column = target.parse::<Column>().ok();
        Column::ALL.into_iter().find_map(|column| {
            let tasks = self.get(column);
            if tasks.is_empty() {
                (target_column == Some(column)).then_some((column, 0))
            } else {
                tasks
                    .iter()
                    .position(|task| task.id.as_str() == target)
                    .map(|index| (column, index))
            }
        })
    }
}

/// Splits `tasks` into lanes, keeping their relative order.
///
/// Tasks whose status is not one of the three lanes are left out; see
/// [`unrecognized_tasks`] to get them back.
pub fn build_columns(tasks: &[Task]) -> Columns {
    let mut columns = Columns::default();
    for task in tasks {
        match task.status.column() {
            Some(column) => columns.get_mut(column).push(task.clone()),
            None => warn!(
                task_id = %task.id,
                status = %task.status,
                "task has an unrecognized status and is not shown on the board"
            ),
        }
    }
    columns
}

/// The tasks [`build_columns`] leaves out, in their original order.
pub fn unrecognized_tasks(tasks: &[Task]) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| task.status.column().is_none())
        .cloned()
        .collect()
}

/// Applies a drag-and-drop gesture: `source_id` is the dragged task,
/// `destination_id` the task it was dropped on or the name of an empty lane.
///
/// Returns the input unchanged when either end cannot be found or when the
/// task was dropped on itself.
pub fn apply_move(columns: &Columns, source_id: &str, destination_id: &str) -> Columns {
    let mut updated = columns.clone();
    if source_id == destination_id {
        return updated;
    }

    let Some((source_column, source_index)) = columns.locate_task(source_id) else {
        return updated;
    };
    let Some((destination_column, destination_index)) =
        columns.locate_drop_target(destination_id)
    else {
        return updated;
    };

    if source_column == destination_column {
        let lane = updated.get_mut(source_column);
        let task = lane.remove(source_index);
        lane.insert(destination_index, task);
    } else {
        let mut task = updated.get_mut(source_column).remove(source_index);
        task.status = TaskStatus::from(destination_column);
        updated
            .get_mut(destination_column)
            .insert(destination_index, task);
    }

    updated
}

/// Concatenates the lanes in canonical order. This is what gets persisted.
pub fn flatten(columns: &Columns) -> Vec<Task> {
    columns
        .iter()
        .flat_map(|(_, tasks)| tasks.iter().cloned())
        .collect()
}
