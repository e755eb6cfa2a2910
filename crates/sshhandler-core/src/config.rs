use plist::{Dictionary, Value};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::DEFAULT_SCHEME;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("plist error: {0}")]
    Plist(#[from] plist::Error),
    #[error("configuration root is not a dictionary")]
    NotADictionary,
}

#[cfg(windows)]
const DEFAULT_CLIENT: &str = "ssh.exe";
#[cfg(not(windows))]
const DEFAULT_CLIENT: &str = "ssh";

/// Settings for the handler, read from an optional plist file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// The SSH client executable.
    pub client: String,
    /// Used instead of the OS user name when a URL has no user.
    pub default_user: Option<String>,
    /// Pre-ticks the legacy toggle in the dialog.
    pub legacy_by_default: bool,
    pub scheme: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            client: DEFAULT_CLIENT.to_string(),
            default_user: None,
            legacy_by_default: false,
            scheme: DEFAULT_SCHEME.to_string(),
        }
    }
}

impl Configuration {
    /// Default configuration file search paths.
    pub fn default_paths() -> Vec<PathBuf> {
        if let Some(path) = std::env::var_os("SSH_HANDLER_CONFIGURATION_PATH") {
            return vec![PathBuf::from(path)];
        }
        dirs::config_dir()
            .map(|dir| dir.join("ssh-handler").join("configuration.plist"))
            .into_iter()
            .collect()
    }

    /// Load configuration from the first valid file in the paths list.
    pub fn load(paths: &[PathBuf]) -> Option<Configuration> {
        for path in paths {
            if !path.exists() {
                continue;
            }
            match Self::open(path) {
                Ok(config) => {
                    log::debug!("loaded configuration from {}", path.display());
                    return Some(config);
                }
                Err(e) => log::warn!("ignoring configuration {}: {e}", path.display()),
            }
        }
        None
    }

    pub fn open(path: &Path) -> Result<Configuration, ConfigError> {
        let data = fs::read(path)?;
        let value = Value::from_reader(Cursor::new(data))?;
        match value {
            Value::Dictionary(dict) => Ok(Self::from_dictionary(&dict)),
            _ => Err(ConfigError::NotADictionary),
        }
    }

    fn from_dictionary(dict: &Dictionary) -> Configuration {
        let defaults = Configuration::default();
        Configuration {
            client: get_string(dict, "Client").unwrap_or(defaults.client),
            default_user: get_string(dict, "DefaultUser"),
            legacy_by_default: dict
                .get("LegacyByDefault")
                .and_then(Value::as_boolean)
                .unwrap_or(defaults.legacy_by_default),
            scheme: get_string(dict, "Scheme").unwrap_or(defaults.scheme),
        }
    }
}

fn get_string(dict: &Dictionary, key: &str) -> Option<String> {
    dict.get(key)
        .and_then(Value::as_string)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
