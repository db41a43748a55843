use std::path::PathBuf;

/// Environment variable overriding where the store file lives
pub const STORE_ENV_VAR: &str = "JIRA_LITE_STORE";

pub struct Config {
    pub store_path: PathBuf,
}

impl Config {
    /// `store` comes from `--store` or [`STORE_ENV_VAR`]; otherwise the store
    /// lives in the platform's local data directory.
    pub fn resolve(store: Option<PathBuf>) -> Self {
        let store_path = store.unwrap_or_else(default_store_path);
        Self { store_path }
    }
}

fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("jira-lite")
        .join("store.json")
}
