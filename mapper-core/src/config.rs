use log::debug;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MapperError, Result};
use crate::storage::DEFAULT_MAPPINGS_FILE;

/// Environment variable overriding the mappings file path
pub const MAPPINGS_FILE_ENV: &str = "UUID_MAPPER_FILE";
/// Environment variable overriding the settings file path
pub const CONFIG_PATH_ENV: &str = "UUID_MAPPER_CONFIG";

/// User settings, read from `~/.uuid-mapper.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Mappings file to use when none is given on the command line
    pub mappings_file: Option<PathBuf>,
    /// Default log filter (e.g. "info"), overridden by RUST_LOG
    pub log_level: Option<String>,
    /// Colorize terminal output
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mappings_file: None,
            log_level: None,
            color: true,
        }
    }
}

impl Settings {
    /// Loads settings from the provided path
    ///
    /// A missing file yields the defaults; the file is never created here.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No settings file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| MapperError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        // An empty YAML document deserializes as unit, not as a mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content).map_err(|e| MapperError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Loads settings from the default location
    pub fn load_default() -> Result<Self> {
        match get_settings_path() {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

/// Gets the path to the settings file
///
/// Returns `None` when neither the override variable nor a home directory is
/// available.
pub fn get_settings_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }

    dirs::home_dir().map(|home| home.join(".uuid-mapper.yaml"))
}

/// Determines which mappings file to use
///
/// Priority: explicit path, then `UUID_MAPPER_FILE`, then the settings file,
/// then `uuid_mappings.json` in the working directory.
pub fn determine_mappings_path(explicit: Option<&Path>, settings: &Settings) -> PathBuf {
    let env_path = env::var_os(MAPPINGS_FILE_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    resolve_mappings_path(explicit, env_path, settings)
}

fn resolve_mappings_path(
    explicit: Option<&Path>,
    env_path: Option<PathBuf>,
    settings: &Settings,
) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    if let Some(path) = env_path {
        return path;
    }

    if let Some(path) = &settings.mappings_file {
        return path.clone();
    }

    PathBuf::from(DEFAULT_MAPPINGS_FILE)
}
