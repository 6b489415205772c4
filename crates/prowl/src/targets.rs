use prowl_common::trace::Target;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("Failed to read target file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse target file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid URL '{url}': {source}")]
    Url {
        url: String,
        source: url::ParseError,
    },
    #[error("Target file is empty")]
    Empty,
}

/// Load the target list from a YAML file. The file is a plain sequence of
/// targets; per-target viewports and click budgets fall back to defaults.
pub async fn load(path: &Path) -> Result<Vec<Target>, TargetError> {
    let content = tokio::fs::read_to_string(path).await?;
    let targets: Vec<Target> = serde_yaml::from_str(&content)?;
    if targets.is_empty() {
        return Err(TargetError::Empty);
    }
    Ok(targets)
}

/// Build a single target from a bare URL, named after its host.
pub fn ad_hoc(raw_url: &str) -> Result<Target, TargetError> {
    let parsed = url::Url::parse(raw_url).map_err(|source| TargetError::Url {
        url: raw_url.to_string(),
        source,
    })?;
    let name = parsed
        .host_str()
        .map(str::to_string)
        .unwrap_or_else(|| "target".to_string());
    Ok(Target::new(name, raw_url))
}
