use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "snapstudio";
const APP_CONFIG_FILE: &str = "config.json";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8787;

/// Studio-side settings from `config.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Overrides the XDG-derived usage ledger location.
    #[serde(default)]
    pub usage_file: Option<PathBuf>,
    /// Where preset records are saved by default.
    #[serde(default)]
    pub preset_dir: Option<PathBuf>,
}

pub fn load_app_config() -> AppConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return AppConfig::default(),
    };
    if !path.exists() {
        return AppConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            AppConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            AppConfig::default()
        }
    }
}

/// Gateway service configuration, read from the environment.
///
/// | Env Var                | Default     |
/// |------------------------|-------------|
/// | `HOST`                 | `127.0.0.1` |
/// | `PORT`                 | `8787`      |
/// | `SNAPSTUDIO_ADMIN_KEY` | unset       |
/// | `SNAPSTUDIO_DB_PATH`   | unset       |
///
/// An unset admin key disables admin verification; an unset database path
/// leaves the subscription registry unconfigured.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub admin_key: Option<String>,
    pub database_path: Option<PathBuf>,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(port = %raw, "PORT is not a valid u16; using default");
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };

        let admin_key = std::env::var("SNAPSTUDIO_ADMIN_KEY")
            .ok()
            .filter(|key| !key.is_empty());
        let database_path = std::env::var_os("SNAPSTUDIO_DB_PATH")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        Self {
            host,
            port,
            admin_key,
            database_path,
        }
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
