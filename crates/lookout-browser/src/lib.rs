//! Browser automation backend for the Lookout UI verification harness
//!
//! This crate drives a real Chrome/Chromium instance over the Chrome
//! DevTools Protocol (CDP) and exposes it behind the [`PageDriver`] trait
//! so the scenario engine never talks to CDP types directly.
//!
//! # Example
//!
//! ```no_run
//! use lookout_browser::{BrowserConfig, BrowserSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = BrowserSession::launch_with_config(BrowserConfig::default()).await?;
//!     session.navigate("http://localhost:3000").await?;
//!     let png = session.capture_screenshot(true).await?;
//!     println!("captured {} bytes", png.len());
//!     session.close().await;
//!     Ok(())
//! }
//! ```
//!
//! # Requirements
//!
//! - Chrome or Chromium installed and discoverable on PATH
//! - No display server needed in headless mode
//!
//! # Architecture
//!
//! - [`browser`]: session lifecycle, navigation, input, screenshots
//! - [`driver`]: the `PageDriver` / `SessionFactory` seams the engine
//!   consumes; fakes implement the same traits in engine tests
//! - [`error`]: error types for browser operations

pub mod browser;
pub mod driver;
pub mod error;

// Re-export commonly used types
pub use browser::{BrowserConfig, BrowserSession};
pub use driver::{BrowserSessionFactory, PageDriver, SessionFactory};
pub use error::{LookoutError, Result};
