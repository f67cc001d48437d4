//! Layered loading of the working-hours policy.
//!
//! Precedence, lowest first: built-in defaults, TOML file (`--config` or
//! `SLOTS_CONFIG`), `SLOTS_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use slot_engine::AvailabilityConfig;

pub const ENV_PREFIX: &str = "SLOTS_";
pub const CONFIG_PATH_VAR: &str = "SLOTS_CONFIG";

pub fn load(path: Option<&Path>) -> Result<AvailabilityConfig> {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();

    let mut figment = Figment::new().merge(Serialized::defaults(AvailabilityConfig::default()));

    let path: Option<PathBuf> = path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from));
    if let Some(path) = path {
        anyhow::ensure!(path.exists(), "Config file not found: {}", path.display());
        figment = figment.merge(Toml::file(path));
    }

    let config: AvailabilityConfig = figment
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]))
        .extract()
        .context("Failed to load configuration")?;

    config.validate().context("Invalid configuration")?;
    Ok(config)
}
