use std::path::PathBuf;

use anyhow::{Context, Result};

fn home() -> Result<PathBuf> {
    dirs::home_dir().context("could not determine home directory")
}

/// Returns `$XDG_CONFIG_HOME/zoneclock` or `~/.config/zoneclock`. Not created.
pub fn config_dir() -> Result<PathBuf> {
    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) => PathBuf::from(dir),
        None => home()?.join(".config"),
    };
    Ok(base.join("zoneclock"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}
