//! Client for the project documents. Every write replaces a whole document
//! (or, for tasks, the whole task list); there is no partial update and no
//! conflict detection, so the last writer wins.

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::{
    models::{
        project::{Project, ProjectDocument},
        task::Task,
    },
    storage::{Storage, StorageError},
};

#[derive(Debug, Error)]
pub enum ProjectStoreError {
    #[error("Project '{0}' not found")]
    ProjectNotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub trait ProjectStore {
    fn list_projects_by_owner(&self, owner: &str) -> Result<Vec<Project>, ProjectStoreError>;
    fn create_project(&self, name: &str, owner: &str) -> Result<Project, ProjectStoreError>;
    fn get_project(&self, id: &str) -> Result<Option<Project>, ProjectStoreError>;
    fn overwrite_tasks(&self, project_id: &str, tasks: &[Task]) -> Result<(), ProjectStoreError>;
}

/// [`ProjectStore`] over the document file behind a [`Storage`].
pub struct DocumentProjectStore<'a, S: Storage> {
    storage: &'a S,
}

impl<'a, S: Storage> DocumentProjectStore<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }
}

impl<S: Storage> ProjectStore for DocumentProjectStore<'_, S> {
    fn list_projects_by_owner(&self, owner: &str) -> Result<Vec<Project>, ProjectStoreError> {
        let store = self.storage.load()?;
        let projects: Vec<Project> = store.get_projects_for_owner(owner).collect();
        debug!(owner, count = projects.len(), "listed projects");
        Ok(projects)
    }

    fn create_project(&self, name: &str, owner: &str) -> Result<Project, ProjectStoreError> {
        let id = Uuid::new_v4().to_string();
        let document = ProjectDocument {
            name: name.to_string(),
            owner: owner.to_string(),
            tasks: vec![],
        };
        self.storage.update(|store| {
            store.add_project(id.clone(), document.clone());
            Ok::<_, ProjectStoreError>(())
        })?;
        debug!(project_id = %id, owner, "project document created");
        Ok(Project::from_document(id, document))
    }

    fn get_project(&self, id: &str) -> Result<Option<Project>, ProjectStoreError> {
        let store = self.storage.load()?;
        Ok(store.get_project(id))
    }

    fn overwrite_tasks(&self, project_id: &str, tasks: &[Task]) -> Result<(), ProjectStoreError> {
        self.storage.update(|store| {
            let document = store
                .projects
                .get_mut(project_id)
                .ok_or_else(|| ProjectStoreError::ProjectNotFound(project_id.to_string()))?;
            document.tasks = tasks.to_vec();
            Ok::<_, ProjectStoreError>(())
        })?;
        debug!(project_id, tasks = tasks.len(), "project tasks overwritten");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::task::{TaskId, TaskStatus},
        storage::memory::MemoryStorage,
    };

    #[test]
    fn test_create_then_get() {
        let storage = MemoryStorage::new();
        let projects = DocumentProjectStore::new(&storage);

        let created = projects.create_project("Website", "u1").unwrap();
        let fetched = projects.get_project(&created.id).unwrap().unwrap();

        assert_eq!(fetched, created);
        assert!(fetched.tasks.is_empty());
        assert_eq!(storage.save_count(), 1);
    }

    #[test]
    fn test_list_only_returns_owned_projects() {
        let storage = MemoryStorage::new();
        let projects = DocumentProjectStore::new(&storage);
        projects.create_project("Mine", "u1").unwrap();
        projects.create_project("Theirs", "u2").unwrap();
        projects.create_project("Also mine", "u1").unwrap();

        let mut names: Vec<String> = projects
            .list_projects_by_owner("u1")
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        names.sort();

        assert_eq!(names, vec!["Also mine", "Mine"]);
    }

    #[test]
    fn test_get_unknown_project_is_none() {
        let storage = MemoryStorage::new();
        let projects = DocumentProjectStore::new(&storage);
        assert!(projects.get_project("nope").unwrap().is_none());
    }

    #[test]
    fn test_overwrite_replaces_whole_list() {
        let storage = MemoryStorage::new();
        let projects = DocumentProjectStore::new(&storage);
        let project = projects.create_project("Website", "u1").unwrap();
        let task = |id: &str| Task {
            id: TaskId::from(id),
            content: String::from("c"),
            assigned_to: String::from("a"),
            status: TaskStatus::ToDo,
        };

        projects
            .overwrite_tasks(&project.id, &[task("a"), task("b")])
            .unwrap();
        projects.overwrite_tasks(&project.id, &[task("c")]).unwrap();

        let stored = projects.get_project(&project.id).unwrap().unwrap();
        assert_eq!(stored.tasks, vec![task("c")]);
    }

    #[test]
    fn test_overwrite_unknown_project_fails() {
        let storage = MemoryStorage::new();
        let projects = DocumentProjectStore::new(&storage);
        assert!(matches!(
            projects.overwrite_tasks("ghost", &[]),
            Err(ProjectStoreError::ProjectNotFound(_))
        ));
        assert_eq!(storage.save_count(), 0);
    }
}
