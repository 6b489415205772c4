use prowl_engine::tuning::Tuning;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Runner-level configuration. Any subset can be given; missing fields keep
/// their defaults, including every field of the tuning table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProwlConfig {
    #[serde(default)]
    pub tuning: Tuning,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ProwlConfig {
    fn default() -> Self {
        ProwlConfig {
            tuning: Tuning::default(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("qa_results")
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from default locations:
    /// 1. ./prowl.yaml
    /// 2. ~/.prowl/config.yaml
    /// 3. Default configuration
    pub async fn load_default() -> Result<ProwlConfig, ConfigError> {
        let local_config = PathBuf::from("./prowl.yaml");
        if local_config.exists() {
            return Self::load_from(&local_config).await;
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".prowl").join("config.yaml");
            if home_config.exists() {
                return Self::load_from(&home_config).await;
            }
        }

        Ok(ProwlConfig::default())
    }

    pub async fn load_from(path: &Path) -> Result<ProwlConfig, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: ProwlConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ProwlConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("qa_results"));
        assert_eq!(config.tuning.scan_step, 20.0);
    }

    #[tokio::test]
    async fn partial_file_overrides_only_named_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prowl.yaml");
        std::fs::write(
            &path,
            "output_dir: /tmp/prowl-out\ntuning:\n  stuck_threshold: 3\n",
        )
        .unwrap();

        let config = ConfigLoader::load_from(&path).await.unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/tmp/prowl-out"));
        assert_eq!(config.tuning.stuck_threshold, 3);
        assert_eq!(config.tuning.scan_step, 20.0);
        assert_eq!(config.tuning.fill_value, "QA Test");
    }

    #[tokio::test]
    async fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prowl.yaml");
        std::fs::write(&path, "tuning: [not, a, map]").unwrap();
        assert!(matches!(
            ConfigLoader::load_from(&path).await,
            Err(ConfigError::Parse(_))
        ));
    }
}
