use serde::{Deserialize, Serialize};

use crate::error::BackendError;

/// Requests executed by the in-page probe script.
///
/// Every request is serialized to JSON and handed to
/// `window.Prowl.process(...)` inside the page. Elements are referenced by a
/// stable opaque id the probe assigns once via a `data-prowl-id` attribute;
/// the Rust side never holds a live node reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ProbeRequest {
    Metrics(MetricsRequest),
    FindContainers(FindContainersRequest),
    SetScroll(SetScrollRequest),
    CollectInputs(CollectInputsRequest),
    CollectClickables(CollectClickablesRequest),
    CollectHorizontals(CollectHorizontalsRequest),
    SetHorizontal(SetHorizontalRequest),
    Query(QueryRequest),
    Click(ClickRequest),
    Fill(FillRequest),
}

/// Scroll metrics of the page (`container: None`) or a tagged container.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MetricsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FindContainersRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetScrollRequest {
    /// None = window scroll, Some(id) = container scrollTop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<u32>,
    pub position: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CollectInputsRequest {}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CollectClickablesRequest {}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CollectHorizontalsRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetHorizontalRequest {
    pub id: u32,
    pub position: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub selector: String,
    /// Exact trimmed-text filter on top of the selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickRequest {
    pub id: u32,
    /// Forced clicks dispatch a synthetic MouseEvent at `offset` from the
    /// element corner, bypassing the hit test (backdrops are often covered).
    #[serde(default)]
    pub force: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<(f64, f64)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillRequest {
    pub id: u32,
    pub value: String,
}

/// Responses received from the probe script.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProbeResponse {
    Ok {
        #[serde(flatten)]
        data: ProbeData,
    },
    Error {
        code: String,
        message: String,
    },
}

impl ProbeResponse {
    pub fn ok(data: ProbeData) -> Self {
        ProbeResponse::Ok { data }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        ProbeResponse::Error {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Collapse the wire-level status into a Result, mapping probe-side
    /// errors onto the backend error taxonomy.
    pub fn into_data(self) -> Result<ProbeData, BackendError> {
        match self {
            ProbeResponse::Ok { data } => Ok(data),
            ProbeResponse::Error { code, message } => Err(BackendError::Probe { code, message }),
        }
    }
}

/// Payloads carried by a successful probe response. Untagged: each payload
/// has a distinct field set, which is what disambiguates them on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProbeData {
    Metrics(ScrollMetrics),
    Containers(ContainerList),
    Inputs(InputList),
    Clickables(ClickableList),
    Horizontals(HorizontalList),
    Elements(ElementList),
    Action(ActionResult),
    Position(PositionResult),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScrollMetrics {
    pub position: f64,
    /// Maximum scroll offset: max(0, content - viewport).
    pub extent: f64,
    pub viewport: f64,
    pub content: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContainerList {
    pub containers: Vec<ContainerInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerInfo {
    pub id: u32,
    pub content: f64,
    pub viewport: f64,
    pub position: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InputList {
    pub inputs: Vec<InputField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputField {
    pub id: u32,
    /// Lowercased `type` attribute, "text" when absent, "textarea" for
    /// textarea elements.
    pub input_type: String,
    pub has_value: bool,
    pub rect: Rect,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClickableList {
    pub clickables: Vec<Clickable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clickable {
    pub id: u32,
    pub tag: String,
    /// Trimmed innerText.
    pub text: String,
    pub rect: Rect,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HorizontalList {
    pub horizontals: Vec<HorizontalRegion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HorizontalRegion {
    pub id: u32,
    pub content_width: f64,
    pub viewport_width: f64,
    pub position: f64,
    /// Computed overflow-x style ("visible", "auto", "scroll", ...).
    pub overflow_x: String,
    pub in_viewport: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ElementList {
    pub elements: Vec<Clickable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionResult {
    pub position: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn sized(width: f64, height: f64) -> Self {
        Rect {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    pub fn is_rendered(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}
