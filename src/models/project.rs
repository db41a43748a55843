use serde::{Deserialize, Serialize};

use crate::models::task::Task;

/// The document persisted for each project, keyed by its id in the store
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct ProjectDocument {
    /// Name of the project
    pub name: String,
    /// uid of the user who created it
    pub owner: String,
    /// Flattened board, To Do first, then In Progress, then Done
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub tasks: Vec<Task>,
}

impl Project {
    pub fn from_document(id: impl Into<String>, document: ProjectDocument) -> Self {
        Self {
            id: id.into(),
            name: document.name,
            owner: document.owner,
            tasks: document.tasks,
        }
    }
}
