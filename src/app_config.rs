/*!
 * Application configuration module
 *
 * Handles the optional JSON configuration file: loading, validating and
 * saving settings that the command line would otherwise have to repeat on
 * every invocation. Command-line flags always win over file values.
 */

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::replacer::TextPlace;

/// Persistent settings for the extraction pipeline
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Locale root for catalog entries
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Where in a tag line the candidate text lives
    #[serde(default)]
    pub place: TextPlace,

    /// Attribute to target when `place` is `attribute`
    #[serde(default)]
    pub attribute_name: Option<String>,

    /// Qualify keys with a namespace derived from the template path
    #[serde(default)]
    pub add_filename_prefix: bool,

    /// Path prefix stripped before deriving the key namespace
    #[serde(default)]
    pub base_path: Option<String>,

    /// Where the accumulated locale catalog is written
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// Log level name (error, warn, info, debug, trace)
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            locale: default_locale(),
            place: TextPlace::default(),
            attribute_name: None,
            add_filename_prefix: false,
            base_path: None,
            catalog_path: None,
            log_level: None,
        }
    }
}

fn default_locale() -> String {
    "en".to_string()
}

impl Config {
    // @returns: Config parsed from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {:?}", path))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    // @returns: Config from the file when it exists, defaults otherwise
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().is_file() {
            Self::from_file(path)
        } else {
            Ok(Config::default())
        }
    }

    // @writes: Config as pretty JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write config file {:?}", path))?;
        Ok(())
    }

    // @validates: Field combinations the CLI cannot enforce for file values
    pub fn validate(&self) -> Result<()> {
        if self.locale.trim().is_empty() {
            return Err(anyhow!("locale must not be empty"));
        }
        if self.place == TextPlace::Attribute
            && self.attribute_name.as_deref().is_none_or(str::is_empty)
        {
            return Err(anyhow!(
                "place \"attribute\" requires a non-empty attribute_name"
            ));
        }
        Ok(())
    }
}
