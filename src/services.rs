pub mod auth;
pub mod board;
pub mod projects;
pub mod tasks;
