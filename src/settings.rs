use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::parser::MissingCategory;

const SETTINGS_FILE: &str = "advisor_scrape";
const ENV_PREFIX: &str = "ADVISOR";

/// Run settings: `advisor_scrape.toml` (optional), then `ADVISOR_*` env vars.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where output files land unless `--output` names a path.
    pub output_dir: PathBuf,
    pub user_agent: String,
    /// Overrides the flat variant's default policy.
    pub on_missing_category: Option<MissingCategory>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            output_dir: PathBuf::from("."),
            user_agent: format!("advisor_scrape/{}", env!("CARGO_PKG_VERSION")),
            on_missing_category: None,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name(SETTINGS_FILE).required(false))
                .add_source(Environment::with_prefix(ENV_PREFIX)),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        builder
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Invalid settings")
    }
}
