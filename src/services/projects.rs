use thiserror::Error;
use tracing::info;

use crate::{
    models::{project::Project, user::User},
    project_store::{ProjectStore, ProjectStoreError},
};

#[derive(Debug, Error)]
pub enum ListProjectsError {
    #[error("You need to log in to see your projects")]
    NotSignedIn,

    #[error("Store error: {0}")]
    Store(#[from] ProjectStoreError),
}

/// Projects owned by `user`, sorted by name (case-insensitive)
pub fn list_projects(
    store: &impl ProjectStore,
    user: Option<&User>,
) -> Result<Vec<Project>, ListProjectsError> {
    let user = user.ok_or(ListProjectsError::NotSignedIn)?;
    let mut projects = store.list_projects_by_owner(&user.uid)?;
    projects.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(projects)
}

#[derive(Debug, Error)]
pub enum CreateProjectError {
    #[error("Project name cannot be empty")]
    EmptyName,

    #[error("You need to log in to create a project")]
    NotSignedIn,

    #[error("Store error: {0}")]
    Store(#[from] ProjectStoreError),
}

pub struct CreateProjectParameters {
    pub name: String,
}

pub fn create_project(
    store: &impl ProjectStore,
    user: Option<&User>,
    parameters: CreateProjectParameters,
) -> Result<Project, CreateProjectError> {
    let name = parameters.name.trim();
    if name.is_empty() {
        return Err(CreateProjectError::EmptyName);
    }
    let user = user.ok_or(CreateProjectError::NotSignedIn)?;

    let project = store.create_project(name, &user.uid)?;
    info!(project_id = %project.id, name = %project.name, owner = %project.owner, "project created");
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{project_store::DocumentProjectStore, storage::memory::MemoryStorage};

    fn user(uid: &str) -> User {
        User {
            uid: uid.to_string(),
            email: format!("{uid}@example.com"),
        }
    }

    #[test]
    fn test_empty_name_is_rejected_without_writing() {
        let storage = MemoryStorage::new();
        let projects = DocumentProjectStore::new(&storage);

        for name in ["", "   "] {
            let result = create_project(
                &projects,
                Some(&user("u1")),
                CreateProjectParameters {
                    name: name.to_string(),
                },
            );
            assert!(matches!(result, Err(CreateProjectError::EmptyName)));
        }
        assert_eq!(storage.save_count(), 0);
    }

    #[test]
    fn test_create_requires_sign_in() {
        let storage = MemoryStorage::new();
        let projects = DocumentProjectStore::new(&storage);

        let result = create_project(
            &projects,
            None,
            CreateProjectParameters {
                name: String::from("Website"),
            },
        );

        assert!(matches!(result, Err(CreateProjectError::NotSignedIn)));
        assert_eq!(storage.save_count(), 0);
    }

    #[test]
    fn test_created_project_is_owned_and_empty() {
        let storage = MemoryStorage::new();
        let projects = DocumentProjectStore::new(&storage);

        let project = create_project(
            &projects,
            Some(&user("u1")),
            CreateProjectParameters {
                name: String::from("  Website  "),
            },
        )
        .unwrap();

        assert_eq!(project.name, "Website");
        assert_eq!(project.owner, "u1");
        assert!(project.tasks.is_empty());
    }

    #[test]
    fn test_list_is_sorted_and_scoped_to_owner() {
        let storage = MemoryStorage::new();
        let projects = DocumentProjectStore::new(&storage);
        for (name, owner) in [("zeta", "u1"), ("Alpha", "u1"), ("beta", "u2")] {
            projects.create_project(name, owner).unwrap();
        }

        let names: Vec<String> = list_projects(&projects, Some(&user("u1")))
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();

        assert_eq!(names, vec!["Alpha", "zeta"]);
        assert!(matches!(
            list_projects(&projects, None),
            Err(ListProjectsError::NotSignedIn)
        ));
    }
}
