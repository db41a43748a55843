use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{
    project::{Project, ProjectDocument},
    user::UserAccount,
};

/// Current schema version
pub const CURRENT_VERSION: u32 = 2;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Store {
    pub version: u32,
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectDocument>,
    #[serde(default)]
    pub accounts: Vec<UserAccount>,
    /// uid of the signed-in user, if any
    #[serde(default)]
    pub session: Option<String>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            projects: BTreeMap::new(),
            accounts: vec![],
            session: None,
        }
    }
}

impl Store {
    pub fn get_project(&self, id: &str) -> Option<Project> {
        self.projects
            .get(id)
            .map(|document| Project::from_document(id, document.clone()))
    }

    pub fn get_projects_for_owner<'a>(&'a self, owner: &'a str) -> impl Iterator<Item = Project> + 'a {
        self.projects
            .iter()
            .filter(move |(_, document)| document.owner == owner)
            .map(|(id, document)| Project::from_document(id.as_str(), document.clone()))
    }

    pub fn add_project(&mut self, id: String, document: ProjectDocument) {
        self.projects.insert(id, document);
    }

    pub fn get_account(&self, uid: &str) -> Option<&UserAccount> {
        self.accounts.iter().find(|a| a.uid == uid)
    }

    pub fn get_account_by_email(&self, email: &str) -> Option<&UserAccount> {
        self.accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email))
    }

    pub fn add_account(&mut self, account: UserAccount) {
        self.accounts.push(account);
    }
}
