use serde::{Deserialize, Serialize};

/// One page to explore. Immutable input, usually deserialized from the
/// target list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    pub url: String,
    #[serde(default = "default_viewports")]
    pub viewports: Vec<ViewportSpec>,
    #[serde(default = "default_max_clicks")]
    pub max_clicks: u32,
}

impl Target {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Target {
            name: name.into(),
            url: url.into(),
            viewports: default_viewports(),
            max_clicks: default_max_clicks(),
        }
    }
}

fn default_viewports() -> Vec<ViewportSpec> {
    vec![ViewportSpec {
        width: 1280,
        height: 720,
        label: "default".to_string(),
    }]
}

fn default_max_clicks() -> u32 {
    20
}

/// One viewport to explore under; list order is traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportSpec {
    pub width: u32,
    pub height: u32,
    pub label: String,
}

/// One observation in the chronological trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    Viewport {
        width: u32,
        height: u32,
        label: String,
    },
    PhaseOneComplete,
    Scroll {
        position: f64,
    },
    ScrollError {
        message: String,
    },
    Input {
        input_type: String,
    },
    Click {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
    },
    SkipClick {
        reason: String,
        text: String,
    },
    ClickError {
        message: String,
    },
    HorizontalScroll {
        count: u32,
    },
}

/// Ordered record of one exploration run. Steps append in program order,
/// which under the single-threaded page contract equals completion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trace {
    pub steps: Vec<Step>,
    pub errors: Vec<String>,
}

impl Trace {
    pub fn push_step(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn click_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, Step::Click { .. }))
            .count()
    }

    pub fn input_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, Step::Input { .. }))
            .count()
    }

    pub fn viewport_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, Step::Viewport { .. }))
            .count()
    }
}

/// Environment error observed by the host's page-scoped subscriptions
/// (console, network, crashes). Drained into `Trace::errors` between
/// viewport passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PageEvent {
    ConsoleError { message: String },
    ConsoleWarning { message: String },
    RequestFailed { url: String, reason: String },
    PageCrashed { message: String },
}

impl std::fmt::Display for PageEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageEvent::ConsoleError { message } => write!(f, "console error: {}", message),
            PageEvent::ConsoleWarning { message } => write!(f, "console warning: {}", message),
            PageEvent::RequestFailed { url, reason } => {
                write!(f, "request failed: {} ({})", url, reason)
            }
            PageEvent::PageCrashed { message } => write!(f, "page crashed: {}", message),
        }
    }
}
