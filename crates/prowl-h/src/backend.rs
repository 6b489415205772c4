use crate::cdp::CdpClient;
use crate::inject::execute_probe;
use async_trait::async_trait;
use prowl_common::trace::PageEvent;
use prowl_engine::backend::{Backend, BackendError, NavigationResult};
use prowl_engine::protocol::{ProbeRequest, ProbeResponse};
use std::path::Path;
use tracing::info;

/// Headless Chromium backend over CDP.
pub struct HeadlessBackend {
    client: Option<CdpClient>,
    visible: bool,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self {
            client: None,
            visible: false,
        }
    }

    pub fn new_with_visibility(visible: bool) -> Self {
        Self {
            client: None,
            visible,
        }
    }

    pub fn get_client(&self) -> Option<&CdpClient> {
        self.client.as_ref()
    }

    async fn get_navigation_result(
        page: &chromiumoxide::Page,
    ) -> Result<NavigationResult, BackendError> {
        let title = page
            .get_title()
            .await
            .unwrap_or_default()
            .unwrap_or_default();
        let url = page
            .url()
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?
            .unwrap_or_default();
        Ok(NavigationResult {
            url,
            title,
            status: 200,
        })
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn map_eval_error(message: String) -> BackendError {
    if message.contains("timed out") {
        BackendError::Timeout(message)
    } else {
        BackendError::ScriptError(message)
    }
}

#[async_trait]
impl Backend for HeadlessBackend {
    async fn launch(&mut self) -> Result<(), BackendError> {
        info!("Launching Headless Backend (Chromium)...");
        let client = CdpClient::launch(self.visible)
            .await
            .map_err(|e| BackendError::Other(e.to_string()))?;
        self.client = Some(client);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        if let Some(client) = self.client.take() {
            client
                .close()
                .await
                .map_err(|e| BackendError::Other(e.to_string()))?;
        }
        Ok(())
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError> {
        let client = self.client.as_mut().ok_or(BackendError::NotReady)?;

        info!("Navigating to: {}", url);
        client
            .page
            .goto(url)
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?;
        if let Err(e) = client.page.wait_for_navigation().await {
            tracing::debug!("wait_for_navigation: {}", e);
        }

        Self::get_navigation_result(&client.page).await
    }

    async fn set_viewport(&mut self, width: u32, height: u32) -> Result<(), BackendError> {
        let client = self.client.as_mut().ok_or(BackendError::NotReady)?;

        use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;

        let params = SetDeviceMetricsOverrideParams::builder()
            .width(width as i64)
            .height(height as i64)
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(|e| BackendError::Other(format!("Failed to build metrics override: {:?}", e)))?;

        client
            .page
            .execute(params)
            .await
            .map_err(|e| BackendError::Other(format!("set_viewport failed: {}", e)))?;
        Ok(())
    }

    async fn probe(&mut self, request: ProbeRequest) -> Result<ProbeResponse, BackendError> {
        let client = self.client.as_mut().ok_or(BackendError::NotReady)?;

        let value = serde_json::to_value(&request)?;
        let result_value = execute_probe(&client.page, value)
            .await
            .map_err(|e| map_eval_error(e.to_string()))?;

        let response: ProbeResponse = serde_json::from_value(result_value)?;
        Ok(response)
    }

    async fn screenshot(&mut self, path: &Path, full_page: bool) -> Result<(), BackendError> {
        let client = self.client.as_ref().ok_or(BackendError::NotReady)?;
        client
            .page
            .save_screenshot(
                chromiumoxide::page::ScreenshotParams::builder()
                    .full_page(full_page)
                    .build(),
                path,
            )
            .await
            .map_err(|e| BackendError::Other(format!("Screenshot failed: {}", e)))?;
        Ok(())
    }

    async fn press_key(&mut self, key: &str) -> Result<(), BackendError> {
        let client = self.client.as_mut().ok_or(BackendError::NotReady)?;

        use chromiumoxide::cdp::browser_protocol::input::{
            DispatchKeyEventParams, DispatchKeyEventType,
        };

        let key_down = DispatchKeyEventParams::builder()
            .r#type(DispatchKeyEventType::KeyDown)
            .key(key)
            .build()
            .map_err(|e| BackendError::Other(format!("Failed to build key event: {:?}", e)))?;

        client
            .page
            .execute(key_down)
            .await
            .map_err(|e| BackendError::Other(format!("press_key down failed: {}", e)))?;

        let key_up = DispatchKeyEventParams::builder()
            .r#type(DispatchKeyEventType::KeyUp)
            .key(key)
            .build()
            .map_err(|e| BackendError::Other(format!("Failed to build key event: {:?}", e)))?;

        client
            .page
            .execute(key_up)
            .await
            .map_err(|e| BackendError::Other(format!("press_key up failed: {}", e)))?;

        Ok(())
    }

    fn drain_page_events(&mut self) -> Vec<PageEvent> {
        match &self.client {
            Some(client) => client.drain_events(),
            None => Vec::new(),
        }
    }
}
