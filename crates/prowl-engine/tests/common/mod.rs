//! Simulated page backend shared by the engine integration tests. It
//! models just enough DOM behavior (scroll clamping, container scroll,
//! value setting, growth) to exercise the exploration heuristics.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use prowl_engine::backend::{Backend, BackendError, NavigationResult};
use prowl_engine::protocol::{
    ActionResult, Clickable, ClickableList, ContainerInfo, ContainerList, ElementList,
    HorizontalList, HorizontalRegion, InputField, InputList, PositionResult, ProbeData,
    ProbeRequest, ProbeResponse, Rect, ScrollMetrics,
};
use prowl_engine::trace::PageEvent;
use prowl_engine::tuning::Tuning;

/// Tuning with every settle delay zeroed so tests run instantly. The
/// interaction timeout stays real; the fake completes immediately anyway.
pub fn fast_tuning() -> Tuning {
    Tuning {
        descend_delay_ms: 0,
        scan_settle_ms: 0,
        hscroll_settle_ms: 0,
        popup_settle_ms: 0,
        viewport_settle_ms: 0,
        bottom_confirm_delay_ms: 0,
        ..Tuning::default()
    }
}

#[derive(Debug, Clone)]
pub struct FakeContainer {
    pub id: u32,
    pub content: f64,
    pub viewport: f64,
    pub position: f64,
}

#[derive(Debug, Clone)]
pub struct FakeInput {
    pub id: u32,
    pub input_type: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FakeClickable {
    pub id: u32,
    pub tag: String,
    pub text: String,
    pub width: f64,
    pub height: f64,
}

impl FakeClickable {
    pub fn button(id: u32, text: &str) -> Self {
        FakeClickable {
            id,
            tag: "button".into(),
            text: text.into(),
            width: 80.0,
            height: 24.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FakeHorizontal {
    pub id: u32,
    pub content_width: f64,
    pub viewport_width: f64,
    pub position: f64,
    pub overflow_x: String,
    pub in_viewport: bool,
    /// Overflowing but refuses to move, like a box clipped by a parent.
    pub immovable: bool,
}

#[derive(Debug, Default)]
pub struct FakePage {
    pub content_height: f64,
    pub viewport_height: f64,
    pub position: f64,
    /// Page scroll position never moves.
    pub frozen: bool,
    /// Content grows by this much on every window scroll, up to the limit.
    pub grow_step: f64,
    pub grow_limit: f64,
    pub containers: Vec<FakeContainer>,
    /// Containers that only appear after the first FindContainers call.
    pub late_containers: Vec<FakeContainer>,
    pub inputs: Vec<FakeInput>,
    pub clickables: Vec<FakeClickable>,
    pub horizontals: Vec<FakeHorizontal>,
    /// Selector that matches a popup close control, and the control's id.
    pub close_button: Option<(String, u32)>,
    pub backdrop: Option<(String, u32)>,
    /// Probe calls allowed before the connection drops.
    pub fail_after: Option<usize>,
    pub pending_events: Vec<PageEvent>,

    pub probes: usize,
    pub requests: Vec<ProbeRequest>,
    pub clicked: Vec<u32>,
    pub filled: Vec<(u32, String)>,
    pub keys: Vec<String>,
    pub viewports: Vec<(u32, u32)>,
    pub shots: Vec<PathBuf>,
    pub max_scroll_position: f64,
}

impl FakePage {
    pub fn with_page(content_height: f64, viewport_height: f64) -> Self {
        FakePage {
            content_height,
            viewport_height,
            ..FakePage::default()
        }
    }

    fn page_extent(&self) -> f64 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    fn page_metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            position: self.position,
            extent: self.page_extent(),
            viewport: self.viewport_height,
            content: self.content_height,
        }
    }

    pub fn set_scroll_count(&self) -> usize {
        self.requests
            .iter()
            .filter(|r| matches!(r, ProbeRequest::SetScroll(_)))
            .count()
    }

    fn simulate(&mut self, request: &ProbeRequest) -> ProbeResponse {
        match request {
            ProbeRequest::Metrics(req) => match req.container {
                None => ProbeResponse::ok(ProbeData::Metrics(self.page_metrics())),
                Some(id) => match self.containers.iter().find(|c| c.id == id) {
                    Some(c) => ProbeResponse::ok(ProbeData::Metrics(ScrollMetrics {
                        position: c.position,
                        extent: (c.content - c.viewport).max(0.0),
                        viewport: c.viewport,
                        content: c.content,
                    })),
                    None => ProbeResponse::error("not_found", format!("no element tagged {}", id)),
                },
            },

            ProbeRequest::FindContainers(_) => {
                let containers = self
                    .containers
                    .iter()
                    .map(|c| ContainerInfo {
                        id: c.id,
                        content: c.content,
                        viewport: c.viewport,
                        position: c.position,
                    })
                    .collect();
                if !self.late_containers.is_empty() {
                    let mut late = std::mem::take(&mut self.late_containers);
                    self.containers.append(&mut late);
                }
                ProbeResponse::ok(ProbeData::Containers(ContainerList { containers }))
            }

            ProbeRequest::SetScroll(req) => match req.container {
                None => {
                    if !self.frozen {
                        self.position = req.position.clamp(0.0, self.page_extent());
                        self.max_scroll_position = self.max_scroll_position.max(self.position);
                        if self.grow_step > 0.0 && self.content_height < self.grow_limit {
                            self.content_height =
                                (self.content_height + self.grow_step).min(self.grow_limit);
                        }
                    }
                    ProbeResponse::ok(ProbeData::Position(PositionResult {
                        position: self.position,
                    }))
                }
                Some(id) => match self.containers.iter_mut().find(|c| c.id == id) {
                    Some(c) => {
                        c.position = req.position.clamp(0.0, (c.content - c.viewport).max(0.0));
                        ProbeResponse::ok(ProbeData::Position(PositionResult {
                            position: c.position,
                        }))
                    }
                    None => ProbeResponse::error("not_found", format!("no element tagged {}", id)),
                },
            },

            ProbeRequest::CollectInputs(_) => {
                let inputs = self
                    .inputs
                    .iter()
                    .map(|f| InputField {
                        id: f.id,
                        input_type: f.input_type.clone(),
                        has_value: f.value.is_some(),
                        rect: Rect::sized(200.0, 30.0),
                    })
                    .collect();
                ProbeResponse::ok(ProbeData::Inputs(InputList { inputs }))
            }

            ProbeRequest::CollectClickables(_) => {
                let clickables = self
                    .clickables
                    .iter()
                    .map(|c| Clickable {
                        id: c.id,
                        tag: c.tag.clone(),
                        text: c.text.clone(),
                        rect: Rect::sized(c.width, c.height),
                    })
                    .collect();
                ProbeResponse::ok(ProbeData::Clickables(ClickableList { clickables }))
            }

            ProbeRequest::CollectHorizontals(_) => {
                let horizontals = self
                    .horizontals
                    .iter()
                    .map(|h| HorizontalRegion {
                        id: h.id,
                        content_width: h.content_width,
                        viewport_width: h.viewport_width,
                        position: h.position,
                        overflow_x: h.overflow_x.clone(),
                        in_viewport: h.in_viewport,
                    })
                    .collect();
                ProbeResponse::ok(ProbeData::Horizontals(HorizontalList { horizontals }))
            }

            ProbeRequest::SetHorizontal(req) => {
                match self.horizontals.iter_mut().find(|h| h.id == req.id) {
                    Some(h) => {
                        if !h.immovable {
                            h.position = req
                                .position
                                .clamp(0.0, (h.content_width - h.viewport_width).max(0.0));
                        }
                        ProbeResponse::ok(ProbeData::Position(PositionResult {
                            position: h.position,
                        }))
                    }
                    None => {
                        ProbeResponse::error("not_found", format!("no element tagged {}", req.id))
                    }
                }
            }

            ProbeRequest::Query(req) => {
                let mut elements = Vec::new();
                let candidates = [
                    (self.close_button.clone(), "Close"),
                    (self.backdrop.clone(), ""),
                ];
                for (candidate, text) in candidates {
                    let Some((selector, id)) = candidate else {
                        continue;
                    };
                    if selector != req.selector {
                        continue;
                    }
                    if let Some(wanted) = &req.text
                        && wanted != text
                    {
                        continue;
                    }
                    elements.push(Clickable {
                        id,
                        tag: "div".into(),
                        text: text.into(),
                        rect: Rect::sized(24.0, 24.0),
                    });
                }
                ProbeResponse::ok(ProbeData::Elements(ElementList { elements }))
            }

            ProbeRequest::Click(req) => {
                self.clicked.push(req.id);
                ProbeResponse::ok(ProbeData::Action(ActionResult {
                    success: true,
                    message: None,
                }))
            }

            ProbeRequest::Fill(req) => {
                if let Some(field) = self.inputs.iter_mut().find(|f| f.id == req.id) {
                    field.value = Some(req.value.clone());
                }
                self.filled.push((req.id, req.value.clone()));
                ProbeResponse::ok(ProbeData::Action(ActionResult {
                    success: true,
                    message: None,
                }))
            }
        }
    }
}

#[async_trait]
impl Backend for FakePage {
    async fn launch(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError> {
        Ok(NavigationResult {
            url: url.to_string(),
            title: "fake".into(),
            status: 200,
        })
    }

    async fn set_viewport(&mut self, width: u32, height: u32) -> Result<(), BackendError> {
        self.viewports.push((width, height));
        Ok(())
    }

    async fn probe(&mut self, request: ProbeRequest) -> Result<ProbeResponse, BackendError> {
        self.probes += 1;
        if let Some(limit) = self.fail_after
            && self.probes > limit
        {
            return Err(BackendError::ConnectionLost);
        }
        self.requests.push(request.clone());
        Ok(self.simulate(&request))
    }

    async fn screenshot(&mut self, path: &Path, _full_page: bool) -> Result<(), BackendError> {
        self.shots.push(path.to_path_buf());
        Ok(())
    }

    async fn press_key(&mut self, key: &str) -> Result<(), BackendError> {
        self.keys.push(key.to_string());
        Ok(())
    }

    fn drain_page_events(&mut self) -> Vec<PageEvent> {
        std::mem::take(&mut self.pending_events)
    }
}
