//! CLI Configuration
//!
//! TOML file at `~/.isms/config.toml`, or `config.<profile>.toml` for a
//! named profile. `ISMS_HOME` replaces `~/.isms`.

use crate::output::OutputFormat;
use anyhow::Context;
use isms_compliance::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DATABASE_FILE: &str = "isms.db";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: Option<PathBuf>,
    /// Tracing filter used when `RUST_LOG` is unset
    pub log_level: Option<String>,
    pub default_format: Option<OutputFormat>,
    /// Name recorded in the journal when `--actor` is absent
    pub actor: Option<String>,
    pub engine: EngineConfig,
}

impl Config {
    pub fn load(profile: Option<&str>) -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path(profile)?)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        config.engine.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?).with_context(|| format!("writing {}", path.display()))
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn config_path(profile: Option<&str>) -> anyhow::Result<PathBuf> {
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(base_dir()?.join(filename))
    }

    /// Configured database, else `isms.db` next to the config file
    pub fn database_path(&self) -> anyhow::Result<PathBuf> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => Ok(base_dir()?.join(DATABASE_FILE)),
        }
    }
}

fn base_dir() -> anyhow::Result<PathBuf> {
    if let Some(dir) = std::env::var_os("ISMS_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("cannot find home directory")?;
    Ok(home.join(".isms"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_survives_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.actor = Some("rssi".into());
        config.default_format = Some(OutputFormat::Json);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.actor.as_deref(), Some("rssi"));
        assert_eq!(loaded.default_format, Some(OutputFormat::Json));
        assert_eq!(loaded.engine, EngineConfig::default());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(config.database.is_none());
    }

    #[test]
    fn test_partial_engine_section() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "database = \"/tmp/audit.db\"\n\n[engine]\ncsv_bom = false\n\n[engine.bands]\nsatisfactory = 90.0\nin_progress = 60.0\n",
        )
        .unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/audit.db"));
        assert!(!config.engine.csv_bom);
        assert_eq!(config.engine.bands.satisfactory, 90.0);
        assert_eq!(config.engine.weights.largely_conforming, 80);
    }

    #[test]
    fn test_invalid_engine_section_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[engine.probe]\nsignal_timeout_secs = 0\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
