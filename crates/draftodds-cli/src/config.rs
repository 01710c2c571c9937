// Configuration loading and parsing (config/lottery.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

/// Name of the config file inside `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "lottery.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub lottery: LotteryConfig,
    pub simulation: SimulationConfig,
    pub data_paths: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LotteryConfig {
    /// Size of the ticket pool the chance table fills.
    pub total_chances: u32,
    /// Tickets by lottery slot, worst team first.
    pub chances: Vec<u32>,
    /// Whether teams with identical records share their slots' tickets.
    #[serde(default = "default_split_ties")]
    pub split_ties: bool,
}

fn default_split_ties() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    pub trials: u32,
    /// Fixed RNG seed; omit for a fresh seed each run.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub standings: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/lottery.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Install `defaults/lottery.toml` as `config/lottery.toml` when the latter is
/// missing. Returns the path written, or `None` if a config was already there.
///
/// An existing config is never overwritten, even if it differs from the
/// shipped defaults.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let source = base_dir.join("defaults").join(CONFIG_FILE);
    let config_dir = base_dir.join("config");
    let target = config_dir.join(CONFIG_FILE);

    if target.exists() {
        return Ok(None);
    }
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no {CONFIG_FILE} in {} or {}",
                config_dir.display(),
                source.display()
            ),
        });
    }

    let content = std::fs::read(&source).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read {}: {e}", source.display()),
    })?;
    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create {}: {e}", config_dir.display()),
    })?;

    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(dest) => dest,
        // Another run created it first; keep theirs.
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(None),
        Err(e) => {
            return Err(ConfigError::DefaultsCopyError {
                message: format!("failed to create {}: {e}", target.display()),
            })
        }
    };
    std::io::Write::write_all(&mut dest, &content).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to write {}: {e}", target.display()),
    })?;

    Ok(Some(target))
}

/// Install the default config if none exists, then load it.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    if let Some(path) = ensure_config_file(base_dir)? {
        info!("Installed default config at {}", path.display());
    }
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let lottery = &config.lottery;
    if lottery.total_chances == 0 {
        return Err(invalid("lottery.total_chances", "must be greater than 0"));
    }

    if lottery.chances.is_empty() {
        return Err(invalid("lottery.chances", "must list at least one slot"));
    }

    let sum: u64 = lottery.chances.iter().map(|&c| u64::from(c)).sum();
    if sum != u64::from(lottery.total_chances) {
        return Err(invalid(
            "lottery.chances",
            format!(
                "must sum to total_chances ({}), got {sum}",
                lottery.total_chances
            ),
        ));
    }

    if config.simulation.trials == 0 {
        return Err(invalid("simulation.trials", "must be greater than 0"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn crate_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    }

    /// Fresh temp dir holding `config/lottery.toml` with the given contents.
    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), contents).unwrap();
        tmp
    }

    fn default_text() -> String {
        fs::read_to_string(crate_root().join("defaults").join(CONFIG_FILE)).unwrap()
    }

    fn expect_validation_field(base: &Path, expected: &str) {
        match load_config_from(base).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn load_default_config() {
        let tmp = temp_config("draftodds_config_defaults", &default_text());
        let config = load_config_from(&tmp).expect("default config should load");

        assert_eq!(config.lottery.total_chances, 1000);
        assert_eq!(config.lottery.chances.len(), 14);
        assert_eq!(config.lottery.chances[0], 250);
        assert!(config.lottery.split_ties);
        assert_eq!(config.simulation.trials, 100_000);
        assert!(config.simulation.seed.is_none());
        assert_eq!(config.data_paths.standings, "data/standings.csv");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn split_ties_defaults_on_and_seed_is_read() {
        let text = r#"
[lottery]
total_chances = 100
chances = [60, 40]

[simulation]
trials = 10
seed = 42

[data_paths]
standings = "s.csv"
"#;
        let tmp = temp_config("draftodds_config_minimal", text);
        let config = load_config_from(&tmp).unwrap();
        assert!(config.lottery.split_ties);
        assert_eq!(config.simulation.seed, Some(42));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_total_chances() {
        let text = default_text().replace("total_chances = 1000", "total_chances = 0");
        let tmp = temp_config("draftodds_config_zero_pool", &text);
        expect_validation_field(&tmp, "lottery.total_chances");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_table_not_filling_pool() {
        let text = default_text().replace("total_chances = 1000", "total_chances = 999");
        let tmp = temp_config("draftodds_config_bad_sum", &text);
        expect_validation_field(&tmp, "lottery.chances");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_trials() {
        let text = default_text().replace("trials = 100000", "trials = 0");
        let tmp = temp_config("draftodds_config_zero_trials", &text);
        expect_validation_field(&tmp, "simulation.trials");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_config() {
        let tmp = std::env::temp_dir().join("draftodds_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        match load_config_from(&tmp).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with(CONFIG_FILE)),
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = temp_config("draftodds_config_invalid", "this is not valid [[[ toml");
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with(CONFIG_FILE)),
            other => panic!("expected ParseError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_file_installs_defaults() {
        let tmp = std::env::temp_dir().join("draftodds_config_ensure_installs");
        let _ = fs::remove_dir_all(&tmp);
        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::write(defaults_dir.join(CONFIG_FILE), default_text()).unwrap();
        fs::write(defaults_dir.join("notes.toml"), "# not a config\n").unwrap();

        let installed = ensure_config_file(&tmp).expect("should succeed");
        assert_eq!(installed, Some(tmp.join("config").join(CONFIG_FILE)));
        assert!(!tmp.join("config/notes.toml").exists());

        // Second run finds the installed file and leaves it alone.
        assert_eq!(ensure_config_file(&tmp).unwrap(), None);

        let config = load_config(&tmp).expect("installed config should load");
        assert_eq!(config.lottery.total_chances, 1000);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_file_keeps_existing() {
        let tmp = temp_config("draftodds_config_ensure_keeps", "# custom\n");
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE), default_text()).unwrap();

        assert_eq!(ensure_config_file(&tmp).unwrap(), None);
        let content = fs::read_to_string(tmp.join("config").join(CONFIG_FILE)).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_file_without_defaults_needs_a_config() {
        let tmp = temp_config("draftodds_config_no_defaults", &default_text());
        assert_eq!(ensure_config_file(&tmp).unwrap(), None);
        assert!(load_config(&tmp).is_ok());
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_file_errors_when_nothing_to_load() {
        let tmp = std::env::temp_dir().join("draftodds_config_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        // A defaults/ directory without the config file is not enough.
        fs::create_dir_all(tmp.join("defaults")).unwrap();

        match ensure_config_file(&tmp).unwrap_err() {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains(CONFIG_FILE), "{message}");
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}
