use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use prowl_common::trace::PageEvent;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::task::JoinHandle;

/// One browser, one page, plus the page-scoped event subscriptions. The
/// event buffer lives exactly as long as the page: it is created here and
/// dropped on close, never shared across pages.
pub struct CdpClient {
    pub browser: Browser,
    pub handler_task: JoinHandle<()>,
    pub page: Page,
    pub events: Arc<Mutex<Vec<PageEvent>>>,
    user_data_dir: Option<PathBuf>,
    cleanup_user_data_dir: bool,
}

impl CdpClient {
    pub async fn launch(visible: bool) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let mut config_builder = BrowserConfig::builder();
        config_builder = config_builder.no_sandbox(); // Often needed in docker/CI/restricted envs
        let (user_data_dir, cleanup_user_data_dir) = resolve_user_data_dir()?;
        config_builder = config_builder.user_data_dir(&user_data_dir);

        if visible {
            tracing::info!("Launching browser in visible mode");
            config_builder = config_builder.with_head();
        } else {
            tracing::info!("Launching browser in headless mode");
        }

        // Support custom Chrome path via CHROME_BIN environment variable
        if let Ok(chrome_bin) = std::env::var("CHROME_BIN") {
            tracing::info!("Using custom Chrome binary: {}", chrome_bin);
            config_builder = config_builder.chrome_executable(chrome_bin);
        }

        let (browser, mut handler) = Browser::launch(
            config_builder
                .build()
                .map_err(|e| format!("Failed to build browser config: {}", e))?,
        )
        .await
        .map_err(|e| format!("Failed to launch browser: {}", e))?;

        // Spawn handler loop
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if let Err(e) = h {
                    tracing::error!("Browser handler error (ignoring): {}", e);
                    continue;
                }
            }
            tracing::info!("Browser handler task ended");
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| format!("Failed to create page: {}", e))?;

        let events: Arc<Mutex<Vec<PageEvent>>> = Arc::new(Mutex::new(Vec::new()));

        subscribe_console(&page, events.clone()).await?;
        subscribe_dialogs(&page).await?;

        if should_enable_network_logging() {
            if let Err(e) = subscribe_network(&page, events.clone()).await {
                tracing::warn!("Failed to enable network logging: {}", e);
            }
        } else {
            tracing::info!("Network logging disabled (set PROWL_NETWORK_LOG=1 to enable)");
        }

        Ok(Self {
            browser,
            handler_task,
            page,
            events,
            user_data_dir: Some(user_data_dir),
            cleanup_user_data_dir,
        })
    }

    /// Take everything the subscriptions collected since the last drain.
    pub fn drain_events(&self) -> Vec<PageEvent> {
        match self.events.lock() {
            Ok(mut buffer) => std::mem::take(&mut *buffer),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub async fn close(mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.browser
            .close()
            .await
            .map_err(|e| format!("Error closing browser: {}", e))?;
        self.handler_task
            .await
            .map_err(|e| format!("Error awaiting handler: {}", e))?;

        if self.cleanup_user_data_dir {
            if let Some(dir) = &self.user_data_dir {
                if let Err(e) = std::fs::remove_dir_all(dir) {
                    tracing::debug!("Failed to clean up user-data-dir {}: {}", dir.display(), e);
                }
            }
        }

        Ok(())
    }
}

/// Console errors and warnings go into the event buffer for the trace; the
/// rest is only traced at debug level.
async fn subscribe_console(
    page: &Page,
    events: Arc<Mutex<Vec<PageEvent>>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use chromiumoxide::cdp::js_protocol::runtime::{
        ConsoleApiCalledType, EventConsoleApiCalled,
    };

    let mut console_events = page
        .event_listener::<EventConsoleApiCalled>()
        .await
        .map_err(|e| format!("Failed to subscribe to console events: {}", e))?;

    tokio::spawn(async move {
        while let Some(event) = console_events.next().await {
            let args_str: Vec<String> = event
                .args
                .iter()
                .map(|arg| {
                    arg.description
                        .clone()
                        .unwrap_or_else(|| "unknown".to_string())
                })
                .collect();
            let message = args_str.join(" ");
            match event.r#type {
                ConsoleApiCalledType::Error => {
                    if let Ok(mut buffer) = events.lock() {
                        buffer.push(PageEvent::ConsoleError { message });
                    }
                }
                ConsoleApiCalledType::Warning => {
                    if let Ok(mut buffer) = events.lock() {
                        buffer.push(PageEvent::ConsoleWarning { message });
                    }
                }
                _ => tracing::debug!("Browser Console [{:?}]: {}", event.r#type, message),
            }
        }
    });

    Ok(())
}

/// JavaScript dialogs (alert/confirm/prompt) block the page's JS thread;
/// auto-accept them so probes keep working.
async fn subscribe_dialogs(page: &Page) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut dialog_events = page
        .event_listener::<chromiumoxide::cdp::browser_protocol::page::EventJavascriptDialogOpening>()
        .await
        .map_err(|e| format!("Failed to subscribe to dialog events: {}", e))?;

    let page_clone = page.clone();
    tokio::spawn(async move {
        while let Some(event) = dialog_events.next().await {
            tracing::info!(
                "Handling JavaScript Dialog: {} ({:?})",
                event.message,
                event.r#type
            );
            let cmd =
                chromiumoxide::cdp::browser_protocol::page::HandleJavaScriptDialogParams::new(true);
            if let Err(e) = page_clone.execute(cmd).await {
                tracing::error!("Failed to handle/accept dialog: {}", e);
            }
        }
    });

    Ok(())
}

/// Error responses (HTTP >= 400) are recorded as page events so they show
/// up in the trace's environment errors.
async fn subscribe_network(
    page: &Page,
    events: Arc<Mutex<Vec<PageEvent>>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut response_events = page
        .event_listener::<chromiumoxide::cdp::browser_protocol::network::EventResponseReceived>()
        .await
        .map_err(|e| format!("Failed to subscribe to network events: {}", e))?;

    tokio::spawn(async move {
        while let Some(event) = response_events.next().await {
            let status = event.response.status;
            if status >= 400 {
                if let Ok(mut buffer) = events.lock() {
                    buffer.push(PageEvent::RequestFailed {
                        url: event.response.url.clone(),
                        reason: format!("HTTP {}", status),
                    });
                }
            } else {
                tracing::debug!("Network Response: [{}] {}", status, event.response.url);
            }
        }
    });

    Ok(())
}

fn should_enable_network_logging() -> bool {
    if let Ok(value) = std::env::var("PROWL_NETWORK_LOG") {
        let normalized = value.trim().to_ascii_lowercase();
        return normalized == "1"
            || normalized == "true"
            || normalized == "yes"
            || normalized == "on";
    }
    false
}

fn resolve_user_data_dir() -> Result<(PathBuf, bool), Box<dyn std::error::Error + Send + Sync>> {
    if let Ok(dir) = std::env::var("PROWL_USER_DATA_DIR") {
        let path = PathBuf::from(dir);
        std::fs::create_dir_all(&path)?;
        tracing::info!(
            "Using user data dir from PROWL_USER_DATA_DIR: {}",
            path.display()
        );
        return Ok((path, false));
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| format!("System clock error: {}", e))?
        .as_nanos();
    let unique = format!("prowl-chromium-profile-{}-{}", std::process::id(), nanos);
    let path = std::env::temp_dir().join(unique);
    std::fs::create_dir_all(&path)?;
    tracing::info!("Using isolated user data dir: {}", path.display());
    Ok((path, true))
}
