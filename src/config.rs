use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to database file
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Path to the log file (the terminal is owned by the review screen)
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,

    /// Log filter used when RUST_LOG is unset (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Copy the database aside once a day on start-up (default: true)
    #[serde(default = "default_daily_backup")]
    pub daily_backup: bool,

    /// Number of daily backups to retain (default: 7)
    #[serde(default = "default_backups_to_keep")]
    pub backups_to_keep: usize,
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("drill").join("drill.db"))
        .unwrap_or_else(|| PathBuf::from("drill.db"))
}

fn default_log_path() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("drill").join("drill.log"))
        .unwrap_or_else(|| PathBuf::from("drill.log"))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_daily_backup() -> bool {
    true
}

fn default_backups_to_keep() -> usize {
    7
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            log_path: default_log_path(),
            log_level: default_log_level(),
            daily_backup: default_daily_backup(),
            backups_to_keep: default_backups_to_keep(),
        }
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(suffix) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(suffix);
    }
    path.to_path_buf()
}

impl Config {
    /// Load config from the default location, or return defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`, or return defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        config.db_path = expand_tilde(&config.db_path);
        config.log_path = expand_tilde(&config.log_path);
        Ok(config)
    }

    /// Path to config file
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join("drill").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Ensure the database and log directories exist
    pub fn ensure_dirs(&self) -> Result<()> {
        for path in [&self.db_path, &self.log_path] {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert!(config.daily_backup);
        assert_eq!(config.backups_to_keep, 7);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "db_path = \"/tmp/cards.db\"").unwrap();
        writeln!(file, "daily_backup = false").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/cards.db"));
        assert!(!config.daily_backup);
        assert_eq!(config.backups_to_keep, 7);
        assert_eq!(config.log_path, default_log_path());
    }

    #[test]
    fn test_tilde_expanded() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "db_path = \"~/cards/drill.db\"").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.db_path, home.join("cards").join("drill.db"));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "backups_to_keep = \"lots\"").unwrap();

        assert!(Config::load_from(file.path()).is_err());
    }

    #[test]
    fn test_ensure_dirs_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            db_path: dir.path().join("data").join("drill.db"),
            log_path: dir.path().join("logs").join("drill.log"),
            ..Config::default()
        };

        config.ensure_dirs().unwrap();
        assert!(dir.path().join("data").is_dir());
        assert!(dir.path().join("logs").is_dir());
    }
}
