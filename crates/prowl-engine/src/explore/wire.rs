//! Typed wrappers over the probe RPC. Each wrapper sends one request and
//! expects one specific payload shape back.

use crate::backend::{Backend, BackendError};
use prowl_common::protocol::{
    ActionResult, ClickRequest, Clickable, CollectClickablesRequest, CollectHorizontalsRequest,
    CollectInputsRequest, ContainerInfo, FillRequest, FindContainersRequest, HorizontalRegion,
    InputField, MetricsRequest, PositionResult, ProbeData, ProbeRequest, QueryRequest,
    ScrollMetrics, SetHorizontalRequest, SetScrollRequest,
};

async fn send(
    backend: &mut dyn Backend,
    request: ProbeRequest,
) -> Result<ProbeData, BackendError> {
    backend.probe(request).await?.into_data()
}

fn unexpected(operation: &str) -> BackendError {
    BackendError::Probe {
        code: "bad_payload".into(),
        message: format!("unexpected payload for {}", operation),
    }
}

pub(crate) async fn metrics(
    backend: &mut dyn Backend,
    container: Option<u32>,
) -> Result<ScrollMetrics, BackendError> {
    match send(backend, ProbeRequest::Metrics(MetricsRequest { container })).await? {
        ProbeData::Metrics(m) => Ok(m),
        _ => Err(unexpected("metrics")),
    }
}

pub(crate) async fn find_containers(
    backend: &mut dyn Backend,
) -> Result<Vec<ContainerInfo>, BackendError> {
    match send(
        backend,
        ProbeRequest::FindContainers(FindContainersRequest {}),
    )
    .await?
    {
        ProbeData::Containers(list) => Ok(list.containers),
        _ => Err(unexpected("find_containers")),
    }
}

pub(crate) async fn set_scroll(
    backend: &mut dyn Backend,
    container: Option<u32>,
    position: f64,
) -> Result<PositionResult, BackendError> {
    match send(
        backend,
        ProbeRequest::SetScroll(SetScrollRequest {
            container,
            position,
        }),
    )
    .await?
    {
        ProbeData::Position(p) => Ok(p),
        _ => Err(unexpected("set_scroll")),
    }
}

pub(crate) async fn collect_inputs(
    backend: &mut dyn Backend,
) -> Result<Vec<InputField>, BackendError> {
    match send(backend, ProbeRequest::CollectInputs(CollectInputsRequest {})).await? {
        ProbeData::Inputs(list) => Ok(list.inputs),
        _ => Err(unexpected("collect_inputs")),
    }
}

pub(crate) async fn collect_clickables(
    backend: &mut dyn Backend,
) -> Result<Vec<Clickable>, BackendError> {
    match send(
        backend,
        ProbeRequest::CollectClickables(CollectClickablesRequest {}),
    )
    .await?
    {
        ProbeData::Clickables(list) => Ok(list.clickables),
        _ => Err(unexpected("collect_clickables")),
    }
}

pub(crate) async fn collect_horizontals(
    backend: &mut dyn Backend,
) -> Result<Vec<HorizontalRegion>, BackendError> {
    match send(
        backend,
        ProbeRequest::CollectHorizontals(CollectHorizontalsRequest {}),
    )
    .await?
    {
        ProbeData::Horizontals(list) => Ok(list.horizontals),
        _ => Err(unexpected("collect_horizontals")),
    }
}

pub(crate) async fn set_horizontal(
    backend: &mut dyn Backend,
    id: u32,
    position: f64,
) -> Result<PositionResult, BackendError> {
    match send(
        backend,
        ProbeRequest::SetHorizontal(SetHorizontalRequest { id, position }),
    )
    .await?
    {
        ProbeData::Position(p) => Ok(p),
        _ => Err(unexpected("set_horizontal")),
    }
}

pub(crate) async fn query(
    backend: &mut dyn Backend,
    selector: &str,
    text: Option<&str>,
) -> Result<Vec<Clickable>, BackendError> {
    match send(
        backend,
        ProbeRequest::Query(QueryRequest {
            selector: selector.to_string(),
            text: text.map(String::from),
        }),
    )
    .await?
    {
        ProbeData::Elements(list) => Ok(list.elements),
        _ => Err(unexpected("query")),
    }
}

pub(crate) async fn click(
    backend: &mut dyn Backend,
    id: u32,
    force: bool,
    offset: Option<(f64, f64)>,
) -> Result<ActionResult, BackendError> {
    match send(backend, ProbeRequest::Click(ClickRequest { id, force, offset })).await? {
        ProbeData::Action(result) => Ok(result),
        _ => Err(unexpected("click")),
    }
}

pub(crate) async fn fill(
    backend: &mut dyn Backend,
    id: u32,
    value: &str,
) -> Result<ActionResult, BackendError> {
    match send(
        backend,
        ProbeRequest::Fill(FillRequest {
            id,
            value: value.to_string(),
        }),
    )
    .await?
    {
        ProbeData::Action(result) => Ok(result),
        _ => Err(unexpected("fill")),
    }
}
