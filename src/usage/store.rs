//! Persistence seam for the usage ledger.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::UsageLedger;

const APP_STATE_DIR: &str = "snapstudio";
const USAGE_FILE: &str = "usage.json";

#[derive(Debug, Error)]
pub enum UsageStoreError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid usage file: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type UsageResult<T> = std::result::Result<T, UsageStoreError>;

pub trait UsageStore {
    fn load(&self) -> UsageResult<UsageLedger>;
    fn save(&self, ledger: &UsageLedger) -> UsageResult<()>;
}

/// Ledger persisted as one JSON object in a namespaced file under the XDG
/// state directory.
#[derive(Debug, Clone)]
pub struct FileUsageStore {
    path: PathBuf,
}

impl FileUsageStore {
    pub const fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn with_default_path() -> UsageResult<Self> {
        let (xdg_state_home, home) = state_env_dirs();
        Ok(Self::with_path(usage_file_path(
            xdg_state_home.as_deref(),
            home.as_deref(),
        )?))
    }

    /// Honors a `usage_file` override from the app config, falling back to
    /// the XDG-derived default.
    pub fn from_config(config: &crate::config::AppConfig) -> UsageResult<Self> {
        match &config.usage_file {
            Some(path) => Ok(Self::with_path(path.clone())),
            None => Self::with_default_path(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UsageStore for FileUsageStore {
    fn load(&self) -> UsageResult<UsageLedger> {
        if !self.path.exists() {
            return Ok(UsageLedger::default());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(UsageLedger::default());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&self, ledger: &UsageLedger) -> UsageResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(ledger)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

fn state_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_STATE_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

fn usage_file_path(xdg_state_home: Option<&Path>, home: Option<&Path>) -> UsageResult<PathBuf> {
    let mut path = state_root(xdg_state_home, home)?;
    path.push(APP_STATE_DIR);
    path.push(USAGE_FILE);
    Ok(path)
}

fn state_root(xdg_state_home: Option<&Path>, home: Option<&Path>) -> UsageResult<PathBuf> {
    if let Some(xdg) = xdg_state_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(UsageStoreError::MissingHomeDirectory)?;
    Ok(home.join(".local").join("state"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_file_path_prefers_xdg_state_home() {
        let path = usage_file_path(
            Some(Path::new("/tmp/state-root")),
            Some(Path::new("/tmp/home")),
        )
        .expect("path should resolve");
        assert_eq!(path, PathBuf::from("/tmp/state-root/snapstudio/usage.json"));
    }

    #[test]
    fn usage_file_path_falls_back_to_home_local_state() {
        let path = usage_file_path(None, Some(Path::new("/tmp/home"))).expect("path should resolve");
        assert_eq!(
            path,
            PathBuf::from("/tmp/home/.local/state/snapstudio/usage.json")
        );
    }

    #[test]
    fn usage_file_path_errors_when_home_missing_and_xdg_unset() {
        let error = usage_file_path(None, None).unwrap_err();
        assert!(matches!(error, UsageStoreError::MissingHomeDirectory));
    }

    #[test]
    fn from_config_prefers_the_configured_override() {
        let config = crate::config::AppConfig {
            usage_file: Some(PathBuf::from("/tmp/override-usage.json")),
            preset_dir: None,
        };
        let store = FileUsageStore::from_config(&config).unwrap();
        assert_eq!(store.path(), Path::new("/tmp/override-usage.json"));
    }

    #[test]
    fn missing_file_loads_as_an_empty_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileUsageStore::with_path(dir.path().join("usage.json"));
        let ledger = store.load().unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn save_creates_parent_directories_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileUsageStore::with_path(dir.path().join("nested").join("usage.json"));

        let mut ledger = UsageLedger::default();
        ledger.bump("chart", 1_000);
        store.save(&ledger).unwrap();

        assert_eq!(store.load().unwrap(), ledger);
    }

    #[test]
    fn corrupt_file_surfaces_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usage.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileUsageStore::with_path(path);
        assert!(matches!(
            store.load().unwrap_err(),
            UsageStoreError::Parse(_)
        ));
    }
}
