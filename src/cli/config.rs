use crate::core::settings::Settings;
use anyhow::{Context, Result};
use std::path::Path;

pub fn run(settings: &Settings, config_override: Option<&Path>, path_only: bool) -> Result<()> {
    if path_only {
        let path = match config_override {
            Some(path) => path.to_path_buf(),
            None => Settings::config_path().context("Could not determine config directory")?,
        };
        println!("{}", path.display());
        return Ok(());
    }

    print!("{}", render(settings)?);
    Ok(())
}

fn render(settings: &Settings) -> Result<String> {
    toml::to_string_pretty(settings).context("Failed to serialize settings")
}
