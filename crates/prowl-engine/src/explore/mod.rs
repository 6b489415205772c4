//! The exploration engine: per-viewport two-phase traversal of one page.
//!
//! Phase 1 passively scrolls the resolved surface all the way down and back
//! up to trigger lazy-loaded content; Phase 2 re-traverses it while probing
//! inputs, clickables and horizontally-scrollable regions. Everything the
//! engine observes lands in an ordered [`Trace`].

pub mod clicks;
pub mod horizontal;
pub mod inputs;
pub mod popup;
pub mod scan;
pub mod surface;
pub mod vertical;
mod wire;

use std::path::PathBuf;

use tracing::{debug, info};

use crate::backend::{Backend, BackendError};
use crate::tuning::Tuning;
use prowl_common::trace::{Step, Target, Trace, ViewportSpec};

/// Top-level per-target driver. One `explore` call runs both phases under
/// every configured viewport and accumulates a single Trace.
pub struct Explorer {
    tuning: Tuning,
    shots_dir: Option<PathBuf>,
}

impl Explorer {
    pub fn new(tuning: Tuning) -> Self {
        Explorer {
            tuning,
            shots_dir: None,
        }
    }

    /// Enable the screenshot hook; one `<label>_before.png` and one
    /// `<label>_after.png` lands in `dir` per viewport pass.
    pub fn with_shots_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.shots_dir = Some(dir.into());
        self
    }

    /// Explore the already-navigated page. Infallible by contract: a fatal
    /// backend failure ends the pass early with a trace-level error, and
    /// everything accumulated so far is still returned.
    pub async fn explore(&self, backend: &mut dyn Backend, target: &Target) -> Trace {
        let mut trace = Trace::default();

        for viewport in &target.viewports {
            if let Err(e) = self
                .explore_viewport(backend, target, viewport, &mut trace)
                .await
            {
                trace.push_error(format!(
                    "exploration aborted at viewport {}: {}",
                    viewport.label, e
                ));
                break;
            }
            for event in backend.drain_page_events() {
                trace.push_error(event.to_string());
            }
        }

        trace
    }

    async fn explore_viewport(
        &self,
        backend: &mut dyn Backend,
        target: &Target,
        viewport: &ViewportSpec,
        trace: &mut Trace,
    ) -> Result<(), BackendError> {
        info!(
            "exploring {} at {}x{} ({})",
            target.name, viewport.width, viewport.height, viewport.label
        );

        match backend.set_viewport(viewport.width, viewport.height).await {
            Ok(()) => {}
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => trace.push_error(format!("viewport {} resize failed: {}", viewport.label, e)),
        }
        trace.push_step(Step::Viewport {
            width: viewport.width,
            height: viewport.height,
            label: viewport.label.clone(),
        });
        tokio::time::sleep(self.tuning.viewport_settle()).await;

        self.capture(backend, viewport, "before", false).await;

        match self.phase_one(backend).await {
            Ok(()) => trace.push_step(Step::PhaseOneComplete),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                trace.push_step(Step::ScrollError {
                    message: e.to_string(),
                });
                trace.push_error(format!("phase 1 failed under {}: {}", viewport.label, e));
            }
        }

        if let Err(e) = scan::interaction_pass(backend, &self.tuning, trace, target.max_clicks).await
        {
            if e.is_fatal() {
                return Err(e);
            }
            trace.push_error(format!("phase 2 failed under {}: {}", viewport.label, e));
        }

        self.capture(backend, viewport, "after", true).await;
        Ok(())
    }

    async fn phase_one(&self, backend: &mut dyn Backend) -> Result<(), BackendError> {
        let mut surface = surface::resolve(backend).await?;
        vertical::descend(backend, &mut surface, &self.tuning).await?;
        vertical::ascend(backend, &surface, &self.tuning).await?;
        Ok(())
    }

    async fn capture(&self, backend: &mut dyn Backend, viewport: &ViewportSpec, suffix: &str, full_page: bool) {
        let Some(dir) = &self.shots_dir else {
            return;
        };
        let path = dir.join(format!("{}_{}.png", viewport.label, suffix));
        if let Err(e) = backend.screenshot(&path, full_page).await {
            debug!("screenshot {} skipped: {}", path.display(), e);
        }
    }
}
