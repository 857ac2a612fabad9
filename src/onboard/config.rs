use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use super::error::Result;
use crate::store::DEFAULT_STORAGE_KEY;

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    pub general: GeneralConfig,
    pub wizard: StepsConfig,
    pub storage: StorageConfig,
    pub commit: CommitConfig,
}

impl WizardConfig {
    /// `$XDG_CONFIG_HOME/profile-wizard/config.toml`, or a relative fallback
    /// when no config directory is known.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join(env!("CARGO_PKG_NAME")))
            .unwrap_or_default()
            .join(CONFIG_FILE)
    }

    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path())
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: WizardConfig = toml::from_str(&content)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub title: String,
    pub subtitle: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            title: "Profile Setup".to_string(),
            subtitle: "Answers are saved as you go".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StepsConfig {
    /// Step to open on; clamped to the last step
    pub initial_step: usize,
    /// Event loop tick in milliseconds (drives the spinner)
    pub tick_rate_ms: u64,
}

impl Default for StepsConfig {
    fn default() -> Self {
        Self {
            initial_step: 0,
            tick_rate_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Where answers are kept. Defaults to the platform data directory.
    pub dir: Option<PathBuf>,
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CommitConfig {
    /// Simulated round-trip time of each commit
    pub delay_ms: u64,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self { delay_ms: 1000 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = WizardConfig::load_from(dir.path().join("nope.toml")).expect("defaults");
        assert_eq!(config.commit.delay_ms, 1000);
        assert_eq!(config.storage.key, "persist:root");
        assert_eq!(config.wizard.initial_step, 0);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[commit]\ndelay_ms = 250\n\n[general]\ntitle = \"Intake\"").expect("write");

        let config = WizardConfig::load_from(file.path()).expect("parse");
        assert_eq!(config.commit.delay_ms, 250);
        assert_eq!(config.general.title, "Intake");
        assert_eq!(config.general.subtitle, GeneralConfig::default().subtitle);
        assert_eq!(config.wizard.tick_rate_ms, 100);
        assert!(config.storage.dir.is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[commit\ndelay_ms = ").expect("write");
        assert!(WizardConfig::load_from(file.path()).is_err());
    }

    #[test]
    fn default_path_ends_in_config_toml() {
        let path = WizardConfig::default_path();
        assert!(path.ends_with("profile-wizard/config.toml") || path == Path::new(CONFIG_FILE));
    }
}
