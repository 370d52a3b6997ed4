//! Settings file for the server
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use serde::Deserialize;

/// Defaults read from a TOML file, each overridable on the command line
#[derive(Clone, Deserialize, Default, Debug)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Settings {
    /// Address for the HTTP server to bind to
    pub host: Option<String>,
    /// Port for the HTTP server to listen on
    pub port: Option<u16>,
    /// Path of the JSON snapshot, relative to the settings file
    pub data: Option<PathBuf>,
    /// Number of worker threads
    pub workers: Option<u32>,
}

impl Settings {
    /// Load the settings stored at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Could not read {}", path.display()))?;
        let mut settings: Settings = toml::from_str(&contents)
            .wrap_err_with(|| format!("Could not parse {}", path.display()))?;

        if let Some(data) = &settings.data {
            if data.is_relative() {
                let root = path.parent().unwrap_or(Path::new(""));
                settings.data = Some(root.join(data));
            }
        }

        Ok(settings)
    }
}
