//! Optional `resxgen.toml` project configuration.
//!
//! Command-line flags always win over values from the file.

use std::fs;
use std::path::{Path, PathBuf};

use resxgen::LineEnding;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "resxgen.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root namespace prefixed to path-derived namespaces.
    pub root_namespace: Option<String>,
    /// Directory that path-derived namespaces are relative to.
    pub project_dir: Option<PathBuf>,
    /// Directory generated files are written to.
    pub out_dir: Option<PathBuf>,
    pub line_ending: Option<LineEnding>,
    /// Encoding label for resource files without a BOM (e.g. "windows-1252").
    pub encoding: Option<String>,
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Invalid configuration: {}", e))
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
        let mut config = Self::from_toml(&content)?;

        // Relative directories in the file are relative to the file itself.
        let base = path.parent().unwrap_or(Path::new(""));
        config.project_dir = config.project_dir.map(|dir| base.join(dir));
        config.out_dir = config.out_dir.map(|dir| base.join(dir));
        Ok(config)
    }

    /// Loads `explicit` if given, else `resxgen.toml` from the working directory when present.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, String> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    tracing::debug!("using {}", DEFAULT_CONFIG_FILE);
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Looks up an encoding by its WHATWG label.
pub fn parse_encoding(label: &str) -> Result<&'static encoding_rs::Encoding, String> {
    encoding_rs::Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| format!("Unknown encoding: {}", label))
}
