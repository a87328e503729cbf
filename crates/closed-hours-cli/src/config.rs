use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Timezone used when neither the flag nor the config file names one.
pub const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";
pub const DEFAULT_DATA_FILE: &str = "closed-hours.json";
/// Picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "closed-hours.toml";

/// Contents of the optional TOML config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub timezone: Option<String>,
    pub data: Option<PathBuf>,
}

/// Settings after applying flags over the file over defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub timezone: String,
    pub data: PathBuf,
}

impl FileConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Load `explicit` if given, else the default file if it exists.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_path(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_path(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn resolve(self, timezone: Option<String>, data: Option<PathBuf>) -> Settings {
        Settings {
            timezone: timezone
                .or(self.timezone)
                .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
            data: data
                .or(self.data)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE)),
        }
    }
}
