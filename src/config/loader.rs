use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

/// Looked up in the working directory, in order, when no `--config` is given.
const DEFAULT_CONFIG_FILES: [&str; 2] = ["clobbr.toml", "clobbr.json"];

/// Config file syntax, chosen by the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    pub(crate) fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let Some(ext) = path.extension() else {
            return Err(ConfigError::MissingExtension);
        };
        match ext.to_str() {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            Some(_) | None => Err(ConfigError::UnsupportedExtension {
                ext: ext.to_string_lossy().into_owned(),
            }),
        }
    }

    fn parse(self, path: &Path, content: &str) -> Result<ConfigFile, ConfigError> {
        match self {
            Self::Toml => toml::from_str(content).map_err(|source| ConfigError::ParseToml {
                path: path.to_path_buf(),
                source,
            }),
            Self::Json => serde_json::from_str(content).map_err(|source| ConfigError::ParseJson {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// First default config file present in the working directory.
pub(crate) fn default_config_path() -> Option<PathBuf> {
    DEFAULT_CONFIG_FILES
        .iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.is_file())
}

/// Reads the run's config: `explicit` when set, else the first default file
/// found. A missing default file is not an error.
///
/// # Errors
///
/// Fails when the chosen file has an unknown extension, cannot be read, or
/// does not parse.
pub fn load_config(explicit: Option<&str>) -> AppResult<Option<ConfigFile>> {
    explicit
        .map(PathBuf::from)
        .or_else(default_config_path)
        .map(|chosen| load_config_file(&chosen))
        .transpose()
}

pub(crate) fn load_config_file(path: &Path) -> AppResult<ConfigFile> {
    let format = ConfigFormat::from_path(path).map_err(AppError::config)?;
    let content = std::fs::read_to_string(path).map_err(|source| {
        AppError::config(ConfigError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })
    })?;
    format.parse(path, &content).map_err(AppError::config)
}
