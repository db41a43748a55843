use std::{fmt, str::FromStr};

use thiserror::Error;

/// The pages of the app, addressable by path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`: the signed-in user's projects
    Home,
    /// `/login`
    Login,
    /// `/register`
    Register,
    /// `/project/:projectId`: the board
    Project(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("No page at '{0}'. Known paths: /, /login, /register, /project/<projectId>")]
pub struct UnknownRoute(pub String);

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let trimmed = path.trim();
        let segments: Vec<&str> = trimmed
            .trim_start_matches('/')
            .trim_end_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Ok(Route::Home),
            ["login"] => Ok(Route::Login),
            ["register"] => Ok(Route::Register),
            ["project", id] => Ok(Route::Project(id.to_string())),
            _ => Err(UnknownRoute(trimmed.to_string())),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => f.write_str("/"),
            Route::Login => f.write_str("/login"),
            Route::Register => f.write_str("/register"),
            Route::Project(id) => write!(f, "/project/{}", id),
        }
    }
}
