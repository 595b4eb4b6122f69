//! Layered application configuration.
//!
//! Values come from built-in defaults, then `~/.config/bingo-cards/config.toml`,
//! then `BINGO_*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::CardsPerPage;

/// Directory name used under the platform config and cache roots.
pub const APP_DIR: &str = "bingo-cards";
const CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "BINGO";

const DEFAULT_CONFIG: &str = r##"# Bingo card creator settings.

# Cards generated per run until changed in the UI.
default_card_count = 1

# Print density: 1, 2 or 4 cards per page.
cards_per_page = 1

# Start with the Fruits, States, Jobs and Numbers lists.
seed_sample_lists = true

# Open the print document in the system browser after writing it.
open_after_print = true

# Where print documents are written. Defaults to the user cache directory.
# output_dir = "/tmp/bingo"

[theme]
# accent = "#7c3aed"
# muted = "#6b7280"
# highlight = "#4f46e5"
"##;

/// Optional colour overrides for the terminal UI, as `#rrggbb` strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Titles and the selection marker.
    pub accent: Option<String>,
    /// Secondary text.
    pub muted: Option<String>,
    /// Highlighted rows and the free space.
    pub highlight: Option<String>,
}

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Initial card count for generation.
    pub default_card_count: usize,
    /// Initial print density.
    pub cards_per_page: CardsPerPage,
    /// Whether to start with the sample lists.
    pub seed_sample_lists: bool,
    /// Directory receiving print documents.
    pub output_dir: PathBuf,
    /// Launch the system opener after writing a print document.
    pub open_after_print: bool,
    /// Colour overrides.
    pub theme: ThemeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_card_count: 1,
            cards_per_page: CardsPerPage::One,
            seed_sample_lists: true,
            output_dir: default_output_dir(),
            open_after_print: true,
            theme: ThemeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load configuration from `path` (optional) layered with environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;

        let config: AppConfig = settings
            .try_deserialize()
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }
}

/// Path of the user configuration file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}

fn default_output_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("print")
}

/// Write the commented default configuration if no config file exists yet.
pub fn ensure_default_config() -> Result<()> {
    write_default_config(config_path())
}

fn write_default_config(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write default config {}", path.display()))?;
    info!(path = %path.display(), "Wrote default config");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_file_parses_to_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join(CONFIG_FILE);
        write_default_config(&path)?;
        assert!(path.exists());

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.default_card_count, 1);
        assert_eq!(config.cards_per_page, CardsPerPage::One);
        assert!(config.seed_sample_lists);
        assert!(config.open_after_print);
        Ok(())
    }

    #[test]
    fn existing_file_is_not_overwritten() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "default_card_count = 8\n")?;
        write_default_config(&path)?;
        assert_eq!(fs::read_to_string(&path)?, "default_card_count = 8\n");
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            "cards_per_page = 4\nseed_sample_lists = false\noutput_dir = \"/tmp/cards\"\n\n[theme]\naccent = \"#ff0000\"\n",
        )?;

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.cards_per_page, CardsPerPage::Four);
        assert!(!config.seed_sample_lists);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/cards"));
        assert_eq!(config.theme.accent.as_deref(), Some("#ff0000"));
        Ok(())
    }

    #[test]
    fn invalid_density_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "cards_per_page = 3\n")?;
        assert!(AppConfig::load_from(&path).is_err());
        Ok(())
    }

    #[test]
    fn missing_file_uses_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("absent.toml"))?;
        assert_eq!(config.default_card_count, 1);
        Ok(())
    }
}
