use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// The identity exposed to the rest of the app once signed in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub uid: String,
    pub email: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserAccount {
    /// UUID string identifying the user; stored as project owner
    pub uid: String,
    /// Login email, compared case-insensitively
    pub email: String,
    /// Hex SHA-256 of salt followed by password
    pub password_hash: String,
    pub salt: String,
    pub created_at: Timestamp,
}

impl UserAccount {
    pub fn user(&self) -> User {
        User {
            uid: self.uid.clone(),
            email: self.email.clone(),
        }
    }
}
