//! Live smoke test against a data: URL page. Skips gracefully when no
//! Chromium is installed.

use prowl_engine::backend::Backend;
use prowl_engine::protocol::{
    CollectClickablesRequest, CollectInputsRequest, FillRequest, MetricsRequest, ProbeData,
    ProbeRequest,
};
use prowl_h::backend::HeadlessBackend;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn headless_lifecycle_and_probes() {
    tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::INFO)
        .try_init()
        .ok();

    let mut backend = HeadlessBackend::new();
    match backend.launch().await {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Failed to launch browser (is Chromium installed?): {}", e);
            return;
        }
    }

    let html = "<html><head><title>Probe Page</title></head><body style='height:3000px'>\
                <button id='btn'>Click Me</button>\
                <input id='email' type='email'>\
                </body></html>";
    let url = format!("data:text/html,{}", html);

    let nav = backend.navigate(&url).await.expect("Navigation failed");
    assert_eq!(nav.title, "Probe Page");

    backend
        .set_viewport(1280, 720)
        .await
        .expect("set_viewport failed");

    // Page metrics should see the 3000px body.
    let resp = backend
        .probe(ProbeRequest::Metrics(MetricsRequest { container: None }))
        .await
        .expect("metrics probe failed");
    match resp.into_data().expect("metrics errored") {
        ProbeData::Metrics(m) => {
            assert!(m.content >= 3000.0, "content was {}", m.content);
            assert!(m.extent > 0.0);
        }
        other => panic!("expected metrics, got {:?}", other),
    }

    // The button is visible and collectable.
    let resp = backend
        .probe(ProbeRequest::CollectClickables(CollectClickablesRequest {}))
        .await
        .expect("clickables probe failed");
    let clickables = match resp.into_data().expect("clickables errored") {
        ProbeData::Clickables(list) => list.clickables,
        other => panic!("expected clickables, got {:?}", other),
    };
    assert!(clickables.iter().any(|c| c.text == "Click Me"));

    // Fill the email field and observe the value through has_value.
    let resp = backend
        .probe(ProbeRequest::CollectInputs(CollectInputsRequest {}))
        .await
        .expect("inputs probe failed");
    let inputs = match resp.into_data().expect("inputs errored") {
        ProbeData::Inputs(list) => list.inputs,
        other => panic!("expected inputs, got {:?}", other),
    };
    let email = inputs
        .iter()
        .find(|f| f.input_type == "email")
        .expect("email input not collected");
    assert!(!email.has_value);

    backend
        .probe(ProbeRequest::Fill(FillRequest {
            id: email.id,
            value: "QA Test".into(),
        }))
        .await
        .expect("fill probe failed")
        .into_data()
        .expect("fill errored");

    let resp = backend
        .probe(ProbeRequest::CollectInputs(CollectInputsRequest {}))
        .await
        .expect("inputs re-probe failed");
    if let ProbeData::Inputs(list) = resp.into_data().expect("inputs errored") {
        let email = list.inputs.iter().find(|f| f.input_type == "email").unwrap();
        assert!(email.has_value);
    }

    backend.close().await.expect("close failed");
}
