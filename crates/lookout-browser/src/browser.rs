//! Browser lifecycle management using Chrome DevTools Protocol

use crate::error::Result;
use headless_chrome::browser::tab::point::Point;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions, Tab};
use lookout_core::{HarnessConfig, LookoutError};
use std::ffi::OsStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How often `wait_for_text` re-reads the page body
const TEXT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration for browser launch
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode (default: true)
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// User agent string
    pub user_agent: Option<String>,
    /// Default timeout for navigation and wait operations, in milliseconds
    pub timeout_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1280,
            window_height: 800,
            user_agent: None,
            timeout_ms: 10_000,
        }
    }
}

impl BrowserConfig {
    /// Derive browser settings from the harness configuration
    pub fn from_harness(config: &HarnessConfig) -> Self {
        Self {
            headless: config.headless,
            window_width: config.viewport_width,
            window_height: config.viewport_height,
            user_agent: None,
            timeout_ms: config.default_timeout_ms,
        }
    }

    /// Default timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Active browser session with Chrome DevTools Protocol
///
/// Each session owns its own browser process and a single tab; scenarios
/// never share a session, so leftover page state cannot leak between them.
pub struct BrowserSession {
    /// Underlying browser instance (kept alive for tab lifetime)
    #[allow(dead_code)]
    browser: Browser,
    /// Current active tab
    tab: Arc<Tab>,
    /// Configuration
    config: BrowserConfig,
    /// Set once `close` has run; makes close idempotent
    closed: AtomicBool,
}

impl BrowserSession {
    /// Launch a new browser instance with default configuration
    pub async fn launch() -> Result<Self> {
        Self::launch_with_config(BrowserConfig::default()).await
    }

    /// Launch browser with custom configuration
    pub async fn launch_with_config(config: BrowserConfig) -> Result<Self> {
        info!(
            "Launching browser (headless: {}, size: {}x{})",
            config.headless, config.window_width, config.window_height
        );

        let mut launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some((config.window_width, config.window_height)))
            .build()
            .map_err(|e| LookoutError::Launch(format!("Failed to build launch options: {}", e)))?;

        // Add user agent if specified
        let user_agent_arg: Option<String> = config
            .user_agent
            .as_ref()
            .map(|ua| format!("--user-agent={}", ua));
        if let Some(ref ua_arg) = user_agent_arg {
            launch_options.args.push(OsStr::new(ua_arg));
        }

        // Launch browser
        let browser = Browser::new(launch_options)
            .map_err(|e| LookoutError::Launch(format!("Failed to launch browser: {}", e)))?;

        // Get initial tab
        let tab = browser
            .new_tab()
            .map_err(|e| LookoutError::Launch(format!("Failed to create tab: {}", e)))?;

        tab.set_default_timeout(config.timeout());

        info!("Browser launched successfully");

        Ok(Self {
            browser,
            tab,
            config,
            closed: AtomicBool::new(false),
        })
    }

    /// Navigate to a URL and wait until the page reports loaded
    pub async fn navigate(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);

        self.tab
            .navigate_to(url)
            .map_err(|e| LookoutError::Navigation(format!("{}: {}", url, e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| LookoutError::Navigation(format!("{}: {}", url, e)))?;

        debug!("Navigated to {}", url);
        Ok(())
    }

    /// Wait until the selector matches at least one element
    pub async fn wait_for_selector(&self, selector: &str, timeout: Option<Duration>) -> Result<()> {
        let timeout = timeout.unwrap_or_else(|| self.config.timeout());

        debug!("Waiting for selector {} (timeout: {:?})", selector, timeout);

        self.tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .map_err(|_e| LookoutError::WaitTimeout(format!("selector \"{}\"", selector)))?;

        debug!("Selector matched: {}", selector);
        Ok(())
    }

    /// Wait until the page body contains the given text
    ///
    /// CDP has no direct "wait for text" primitive, so the body is polled
    /// at a fixed interval until the deadline passes.
    pub async fn wait_for_text(&self, text: &str, timeout: Option<Duration>) -> Result<()> {
        let timeout = timeout.unwrap_or_else(|| self.config.timeout());
        let deadline = Instant::now() + timeout;

        debug!("Waiting for text {:?} (timeout: {:?})", text, timeout);

        loop {
            if self.body_text().await?.contains(text) {
                debug!("Text found: {:?}", text);
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(LookoutError::WaitTimeout(format!("text \"{}\"", text)));
            }
            tokio::time::sleep(TEXT_POLL_INTERVAL).await;
        }
    }

    /// Execute JavaScript in the page context
    ///
    /// # Returns
    /// JSON result from JavaScript execution
    pub async fn evaluate_script(&self, script: &str) -> Result<serde_json::Value> {
        debug!("Evaluating JavaScript: {}", script);

        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| LookoutError::Evaluation(format!("{}", e)))?;

        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }

    /// Set a form field's value and fire the input/change events frameworks
    /// listen for
    pub async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        debug!("Filling {} with {} characters", selector, value.chars().count());

        let script = format!(
            r#"(() => {{
                const el = document.querySelector({sel});
                if (!el) return false;
                el.focus();
                el.value = {val};
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()"#,
            sel = js_string(selector),
            val = js_string(value),
        );

        let found = self.evaluate_script(&script).await?;
        if found.as_bool() != Some(true) {
            return Err(LookoutError::ElementNotFound(selector.to_string()));
        }
        Ok(())
    }

    /// Send keystrokes to the focused element
    ///
    /// With a non-zero delay each character is sent on its own, which is
    /// what animated "typing" UIs need to render keystroke by keystroke.
    pub async fn type_text(&self, text: &str, delay_ms: u64) -> Result<()> {
        debug!("Typing {} characters (delay: {}ms)", text.chars().count(), delay_ms);

        if delay_ms == 0 {
            self.tab
                .type_str(text)
                .map_err(|e| LookoutError::Input(format!("typing failed: {}", e)))?;
            return Ok(());
        }

        let mut buf = [0u8; 4];
        for c in text.chars() {
            self.tab
                .type_str(c.encode_utf8(&mut buf))
                .map_err(|e| LookoutError::Input(format!("typing failed: {}", e)))?;
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
        Ok(())
    }

    /// Click the first element matching the selector
    pub async fn click(&self, selector: &str) -> Result<()> {
        debug!("Clicking {}", selector);

        let element = self
            .tab
            .find_element(selector)
            .map_err(|_e| LookoutError::ElementNotFound(selector.to_string()))?;

        element
            .click()
            .map_err(|e| LookoutError::Input(format!("click on {} failed: {}", selector, e)))?;

        Ok(())
    }

    /// Move the mouse to viewport coordinates
    pub async fn move_mouse(&self, x: f64, y: f64) -> Result<()> {
        debug!("Moving mouse to ({}, {})", x, y);

        self.tab
            .move_mouse_to_point(Point { x, y })
            .map_err(|e| LookoutError::Input(format!("mouse move failed: {}", e)))?;

        Ok(())
    }

    /// Capture a PNG screenshot of the current page
    pub async fn capture_screenshot(&self, full_page: bool) -> Result<Vec<u8>> {
        debug!("Capturing screenshot (full_page: {})", full_page);

        let data = self
            .tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, full_page)
            .map_err(|e| LookoutError::Screenshot(format!("{}", e)))?;

        debug!("Captured {} bytes", data.len());
        Ok(data)
    }

    /// Visible text of the page body
    pub async fn body_text(&self) -> Result<String> {
        let result = self
            .evaluate_script("document.body ? document.body.innerText : ''")
            .await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }

    /// Number of elements matching the selector
    pub async fn count_elements(&self, selector: &str) -> Result<usize> {
        let script = format!(
            "document.querySelectorAll({}).length",
            js_string(selector)
        );
        let result = self.evaluate_script(&script).await?;
        Ok(result.as_u64().unwrap_or(0) as usize)
    }

    /// Close the browser session
    ///
    /// Idempotent and infallible: a scenario result must never be clobbered
    /// by a failure during teardown, so close errors are logged and dropped.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        info!("Closing browser session");
        if let Err(e) = self.tab.close(false) {
            warn!("Tab close failed (browser process will still be reaped): {}", e);
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        debug!("BrowserSession dropped, browser process will be cleaned up");
    }
}

/// Embed a Rust string as a JavaScript string literal
fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}
