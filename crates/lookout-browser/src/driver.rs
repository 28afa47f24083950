//! Driver traits decoupling the scenario engine from CDP
//!
//! The engine only ever sees `dyn PageDriver` and `dyn SessionFactory`;
//! tests substitute in-memory fakes behind the same traits.

use crate::browser::{BrowserConfig, BrowserSession};
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Page-level operations a scenario step can perform
///
/// One driver corresponds to one live page. Implementations must be safe
/// to call from a spawned task.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Load a URL and wait for the page to settle
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Wait until the selector matches at least one element
    async fn wait_for_selector(&self, selector: &str, timeout: Option<Duration>) -> Result<()>;

    /// Wait until the page body contains the text
    async fn wait_for_text(&self, text: &str, timeout: Option<Duration>) -> Result<()>;

    /// Set a form field's value
    async fn fill(&self, selector: &str, value: &str) -> Result<()>;

    /// Send keystrokes to the focused element
    async fn type_text(&self, text: &str, delay_ms: u64) -> Result<()>;

    /// Click the first element matching the selector
    async fn click(&self, selector: &str) -> Result<()>;

    /// Move the mouse to viewport coordinates
    async fn move_mouse(&self, x: f64, y: f64) -> Result<()>;

    /// Capture a PNG screenshot of the current page
    async fn capture_screenshot(&self, full_page: bool) -> Result<Vec<u8>>;

    /// Visible text of the page body
    async fn body_text(&self) -> Result<String>;

    /// Number of elements matching the selector
    async fn count_elements(&self, selector: &str) -> Result<usize>;

    /// Release the session. Must be idempotent and must not fail.
    async fn close(&self);
}

#[async_trait]
impl PageDriver for BrowserSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        BrowserSession::navigate(self, url).await
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Option<Duration>) -> Result<()> {
        BrowserSession::wait_for_selector(self, selector, timeout).await
    }

    async fn wait_for_text(&self, text: &str, timeout: Option<Duration>) -> Result<()> {
        BrowserSession::wait_for_text(self, text, timeout).await
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        BrowserSession::fill(self, selector, value).await
    }

    async fn type_text(&self, text: &str, delay_ms: u64) -> Result<()> {
        BrowserSession::type_text(self, text, delay_ms).await
    }

    async fn click(&self, selector: &str) -> Result<()> {
        BrowserSession::click(self, selector).await
    }

    async fn move_mouse(&self, x: f64, y: f64) -> Result<()> {
        BrowserSession::move_mouse(self, x, y).await
    }

    async fn capture_screenshot(&self, full_page: bool) -> Result<Vec<u8>> {
        BrowserSession::capture_screenshot(self, full_page).await
    }

    async fn body_text(&self) -> Result<String> {
        BrowserSession::body_text(self).await
    }

    async fn count_elements(&self, selector: &str) -> Result<usize> {
        BrowserSession::count_elements(self, selector).await
    }

    async fn close(&self) {
        BrowserSession::close(self).await
    }
}

/// Produces a fresh page driver per scenario
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Acquire a new, isolated driver
    async fn acquire(&self) -> Result<Box<dyn PageDriver>>;
}

/// Factory launching one browser process per acquired session
#[derive(Debug, Clone)]
pub struct BrowserSessionFactory {
    config: BrowserConfig,
}

impl BrowserSessionFactory {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionFactory for BrowserSessionFactory {
    async fn acquire(&self) -> Result<Box<dyn PageDriver>> {
        debug!("Acquiring fresh browser session");
        let session = BrowserSession::launch_with_config(self.config.clone()).await?;
        Ok(Box::new(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_holds_config() {
        let config = BrowserConfig {
            timeout_ms: 1_234,
            ..BrowserConfig::default()
        };
        let factory = BrowserSessionFactory::new(config);
        assert_eq!(factory.config.timeout_ms, 1_234);
    }
}
