use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::types::AppConfig;

/// Discover and load the app config.
///
/// Priority:
/// 1. `--config` flag (explicit path)
/// 2. `$PR_BOARD_CONFIG` environment variable
/// 3. `$XDG_CONFIG_HOME/pr-board/config.toml`
/// 4. `~/.config/pr-board/config.toml`
///
/// With nothing found the defaults are used.
pub fn load_config(explicit_path: Option<&Path>) -> Result<AppConfig> {
    let path = match explicit_path {
        Some(path) => Some(path.to_path_buf()),
        None => find_global_config(),
    };

    let Some(path) = path else {
        tracing::debug!("config: none found, using defaults");
        return Ok(AppConfig::default());
    };

    let contents =
        std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let config: AppConfig = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML from {}", path.display()))?;
    tracing::debug!("config: loaded {}", path.display());
    Ok(config)
}

fn find_global_config() -> Option<PathBuf> {
    candidate_paths(|key| std::env::var_os(key))
        .into_iter()
        .find(|p| p.is_file())
}

/// Config locations in lookup order, built from the given environment.
fn candidate_paths(env: impl Fn(&str) -> Option<OsString>) -> Vec<PathBuf> {
    let explicit = env("PR_BOARD_CONFIG").map(PathBuf::from);
    let xdg = env("XDG_CONFIG_HOME").map(|dir| PathBuf::from(dir).join(CONFIG_SUFFIX));
    let home = env("HOME").map(|home| PathBuf::from(home).join(".config").join(CONFIG_SUFFIX));
    [explicit, xdg, home].into_iter().flatten().collect()
}

const CONFIG_SUFFIX: &str = "pr-board/config.toml";
