use crate::browser::{LaunchOptions, LoadState, NavigationRecord, PageDriver};
use crate::cookies::Cookie;
use crate::error::{Result, SolverError};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use headless_chrome::protocol::cdp::Network;
use headless_chrome::{Browser, Tab};
use indexmap::IndexMap;
use std::ffi::OsStr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Poll period for load-state waits
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How long the resource count must hold still to count as network idle
const NETWORK_IDLE_WINDOW: Duration = Duration::from_millis(500);

/// Tracks whether the page's resource count has held still long enough to
/// call the network idle. An unreadable count never counts as stable.
struct ResourceQuiescence {
    last_count: Option<i64>,
    stable_since: Instant,
}

impl ResourceQuiescence {
    fn new() -> Self {
        Self { last_count: None, stable_since: Instant::now() }
    }

    fn observe(&mut self, count: Option<i64>) -> bool {
        match (count, self.last_count) {
            (Some(current), Some(previous)) if current == previous => {
                self.stable_since.elapsed() >= NETWORK_IDLE_WINDOW
            }
            _ => {
                self.last_count = count;
                self.stable_since = Instant::now();
                false
            }
        }
    }
}

/// Main-document response captured by the CDP response handler
#[derive(Debug, Clone)]
struct CapturedResponse {
    status: u16,
    headers: IndexMap<String, String>,
    body: Option<String>,
}

/// Browser session driving one Chrome/Chromium page over CDP.
///
/// One session belongs to exactly one resolution request; concurrent
/// requests each launch their own.
pub struct DriverSession {
    browser: Browser,
    tab: Arc<Tab>,
    last_response: Arc<Mutex<Option<CapturedResponse>>>,
}

impl DriverSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Ignore default arguments to prevent detection by anti-bot services
        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));

        // The browser must outlive a slow challenge solve; the default 30s idle timeout is too short
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);

        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));
        launch_opts.sandbox = options.sandbox;

        if let Some(path) = options.chrome_path {
            launch_opts.path = Some(path);
        }

        if let Some(dir) = options.user_data_dir {
            launch_opts.user_data_dir = Some(dir);
        }

        let browser = Browser::new(launch_opts).map_err(|e| SolverError::LaunchFailed(e.to_string()))?;

        let tab = browser
            .new_tab()
            .map_err(|e| SolverError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        Ok(Self { browser, tab, last_response: Arc::new(Mutex::new(None)) })
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Register a handler that captures status, headers and raw body of the
    /// main-document response for the upcoming navigation.
    fn capture_document_response(&self) -> Result<()> {
        self.last_response
            .lock()
            .map_err(|e| SolverError::TabOperationFailed(format!("Response slot poisoned: {}", e)))?
            .take();

        let slot = Arc::clone(&self.last_response);
        self.tab
            .register_response_handling(
                "document-capture",
                Box::new(move |params, fetch_body| {
                    if !matches!(params.Type, Network::ResourceType::Document) {
                        return;
                    }

                    // The body may not be available yet at response-received
                    // time; a failed read here falls back to rendered content
                    // later in the pipeline.
                    let body = match fetch_body() {
                        Ok(raw) if raw.base_64_encoded => BASE64
                            .decode(raw.body.as_bytes())
                            .ok()
                            .and_then(|bytes| String::from_utf8(bytes).ok()),
                        Ok(raw) => Some(raw.body),
                        Err(e) => {
                            log::debug!("Raw response body not readable: {}", e);
                            None
                        }
                    };

                    let headers = header_map(&params.response.headers);
                    if let Ok(mut captured) = slot.lock() {
                        *captured = Some(CapturedResponse {
                            status: params.response.status as u16,
                            headers,
                            body,
                        });
                    }
                }),
            )
            .map_err(|e| SolverError::NavigationFailed(format!("Failed to register response handler: {}", e)))?;

        Ok(())
    }
}

/// Flatten CDP headers into an ordered string map
fn header_map(headers: &Network::Headers) -> IndexMap<String, String> {
    let mut map = IndexMap::new();
    if let Ok(serde_json::Value::Object(entries)) = serde_json::to_value(headers) {
        for (name, value) in entries {
            let value = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            map.insert(name, value);
        }
    }
    map
}

/// Classify a driver error, folding anything timeout-shaped into the
/// pipeline's single timeout category
fn classify(context: &str, err: impl ToString) -> SolverError {
    let message = err.to_string();
    let lowered = message.to_lowercase();
    if lowered.contains("timeout") || lowered.contains("timed out") {
        SolverError::Timeout(format!("{}: {}", context, message))
    } else {
        SolverError::NavigationFailed(format!("{}: {}", context, message))
    }
}

impl PageDriver for DriverSession {
    fn navigate(&mut self, url: &str, timeout: Duration) -> Result<Option<NavigationRecord>> {
        self.capture_document_response()?;

        self.tab.set_default_timeout(timeout);

        self.tab
            .navigate_to(url)
            .map_err(|e| classify(&format!("Failed to navigate to {}", url), e))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| classify(&format!("Navigation to {} did not complete", url), e))?;

        let record = self
            .last_response
            .lock()
            .map_err(|e| SolverError::TabOperationFailed(format!("Response slot poisoned: {}", e)))?
            .as_ref()
            .map(|captured| NavigationRecord { status: captured.status, headers: captured.headers.clone() });

        Ok(record)
    }

    fn wait_for_load_state(&mut self, state: LoadState, timeout: Duration) -> Result<()> {
        let start = Instant::now();

        match state {
            LoadState::DomContentLoaded => loop {
                if start.elapsed() >= timeout {
                    return Err(SolverError::Timeout("Waiting for domcontentloaded".to_string()));
                }

                if let Ok(value) = self.evaluate("document.readyState") {
                    if matches!(value.as_str(), Some("interactive") | Some("complete")) {
                        return Ok(());
                    }
                }

                std::thread::sleep(POLL_INTERVAL);
            },
            LoadState::NetworkIdle => {
                let mut quiescence = ResourceQuiescence::new();

                loop {
                    if start.elapsed() >= timeout {
                        return Err(SolverError::Timeout("Waiting for networkidle".to_string()));
                    }

                    let count = self
                        .evaluate("performance.getEntriesByType('resource').length")
                        .ok()
                        .and_then(|v| v.as_i64());

                    if quiescence.observe(count) {
                        return Ok(());
                    }

                    std::thread::sleep(POLL_INTERVAL);
                }
            }
        }
    }

    fn evaluate(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| SolverError::EvaluationFailed(format!("Script evaluation failed: {}", e)))?;

        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }

    fn current_url(&self) -> String {
        self.tab.get_url()
    }

    fn title(&self) -> Result<String> {
        self.tab
            .get_title()
            .map_err(|e| SolverError::EvaluationFailed(format!("Failed to read title: {}", e)))
    }

    fn content(&self) -> Result<String> {
        self.tab
            .get_content()
            .map_err(|e| SolverError::EvaluationFailed(format!("Failed to read page content: {}", e)))
    }

    fn cookies(&self) -> Result<Vec<Cookie>> {
        let cookies = self
            .tab
            .get_cookies()
            .map_err(|e| SolverError::TabOperationFailed(format!("Failed to read cookies: {}", e)))?;

        Ok(cookies.into_iter().map(Cookie::from).collect())
    }

    fn response_body(&self) -> Result<String> {
        self.last_response
            .lock()
            .map_err(|e| SolverError::BodyUnavailable(format!("Response slot poisoned: {}", e)))?
            .as_ref()
            .and_then(|captured| captured.body.clone())
            .ok_or_else(|| SolverError::BodyUnavailable("No raw body captured for the last navigation".to_string()))
    }
}
