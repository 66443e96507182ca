/// Config file loading and creation for the pairank CLI.
///
/// Config lives at ~/.config/pairank/config.toml.
/// All fields are optional; CLI flags override config values.
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PairankConfig {
    pub state_file: Option<String>,
    pub json: Option<bool>,
    pub seed: Option<u64>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# pairank configuration
# All values here can be overridden by CLI flags.

# Where items and recorded comparisons are kept
# state_file = \"/home/me/.local/share/pairank/state.json\"

# Print JSON instead of tables
# json = false

# Fixed seed for the pair draw (reproducible sessions, mostly for debugging)
# seed = 42
";

fn home_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home))
}

/// Returns the default config path: ~/.config/pairank/config.toml
pub fn config_path() -> Result<PathBuf> {
    Ok(home_dir()?.join(".config").join("pairank").join("config.toml"))
}

/// Returns the default state path: ~/.local/share/pairank/state.json
pub fn default_state_path() -> Result<PathBuf> {
    Ok(home_dir()?.join(".local").join("share").join("pairank").join("state.json"))
}

pub fn parse_config(content: &str) -> Result<PairankConfig> {
    Ok(toml::from_str(content)?)
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> Result<PairankConfig> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PairankConfig::default()),
        Err(e) => Err(e).with_context(|| format!("Failed to read config at {}", path.display())),
    }
}

/// Create the default config file. Errors if it already exists.
pub fn create_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("Config file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write config to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_parses_to_empty_config() {
        assert_eq!(parse_config(DEFAULT_CONFIG_TEMPLATE).unwrap(), PairankConfig::default());
    }

    #[test]
    fn test_parse_all_fields() {
        let cfg = parse_config("state_file = \"/tmp/s.json\"\njson = true\nseed = 7\n").unwrap();
        assert_eq!(cfg.state_file.as_deref(), Some("/tmp/s.json"));
        assert_eq!(cfg.json, Some(true));
        assert_eq!(cfg.seed, Some(7));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(parse_config("endpoint = \"http://localhost\"").is_err());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, PairankConfig::default());
    }

    #[test]
    fn test_create_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        create_default_config(&path).unwrap();
        assert!(path.exists());
        assert!(create_default_config(&path).is_err());
    }
}
