use crate::config::ProwlConfig;
use chrono::Local;
use prowl_common::trace::{Target, Trace};
use prowl_engine::backend::Backend;
use prowl_engine::explore::Explorer;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

/// Navigation gets one retry before the target is written off.
const NAVIGATION_ATTEMPTS: u32 = 2;
const NAVIGATION_BACKOFF: Duration = Duration::from_secs(2);

/// Outcome for one target. A target that never loaded has no trace, only a
/// failure; an explored target always has a trace (possibly with errors).
#[derive(Debug, Serialize)]
pub struct TargetResult {
    pub target: Target,
    pub trace: Option<Trace>,
    pub failure: Option<String>,
}

pub struct RunOutcome {
    pub result_dir: PathBuf,
    pub results: Vec<TargetResult>,
}

/// Drives one run: a timestamped result directory, then every target in
/// order against the shared backend. A dead target never stops the run.
pub struct Runner {
    config: ProwlConfig,
}

impl Runner {
    pub fn new(config: ProwlConfig) -> Self {
        Runner { config }
    }

    pub async fn run(
        &self,
        backend: &mut dyn Backend,
        targets: &[Target],
    ) -> std::io::Result<RunOutcome> {
        let result_dir = self
            .config
            .output_dir
            .join(Local::now().format("%Y%m%d_%H%M%S").to_string());
        tokio::fs::create_dir_all(&result_dir).await?;
        info!("Writing results to {}", result_dir.display());

        let mut results = Vec::with_capacity(targets.len());
        for target in targets {
            results.push(self.run_target(backend, target, &result_dir).await?);
        }

        Ok(RunOutcome {
            result_dir,
            results,
        })
    }

    async fn run_target(
        &self,
        backend: &mut dyn Backend,
        target: &Target,
        result_dir: &Path,
    ) -> std::io::Result<TargetResult> {
        info!("Target '{}': {}", target.name, target.url);

        if let Err(e) = self.navigate_with_retry(backend, target).await {
            error!("Target '{}' never loaded: {}", target.name, e);
            return Ok(TargetResult {
                target: target.clone(),
                trace: None,
                failure: Some(e),
            });
        }

        let shots_dir = result_dir.join("shots").join(sanitize_name(&target.name));
        tokio::fs::create_dir_all(&shots_dir).await?;

        let explorer = Explorer::new(self.config.tuning.clone()).with_shots_dir(&shots_dir);
        let trace = explorer.explore(backend, target).await;
        info!(
            "Target '{}' done: {} clicks, {} inputs, {} errors",
            target.name,
            trace.click_count(),
            trace.input_count(),
            trace.errors.len()
        );

        Ok(TargetResult {
            target: target.clone(),
            trace: Some(trace),
            failure: None,
        })
    }

    async fn navigate_with_retry(
        &self,
        backend: &mut dyn Backend,
        target: &Target,
    ) -> Result<(), String> {
        let mut last_error = String::new();
        for attempt in 1..=NAVIGATION_ATTEMPTS {
            match backend.navigate(&target.url).await {
                Ok(nav) => {
                    info!("Loaded '{}' ({})", nav.title, nav.url);
                    return Ok(());
                }
                Err(e) => {
                    warn!(
                        "Navigation to {} failed (attempt {}/{}): {}",
                        target.url, attempt, NAVIGATION_ATTEMPTS, e
                    );
                    last_error = e.to_string();
                    if attempt < NAVIGATION_ATTEMPTS {
                        tokio::time::sleep(NAVIGATION_BACKOFF).await;
                    }
                }
            }
        }
        Err(last_error)
    }
}

/// Target names come from user config or URL hosts; keep the directory
/// names portable.
pub(crate) fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
