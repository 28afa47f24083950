//! Browser automation error types - re-exports the unified LookoutError
//!
//! Browser operations map onto the session-facing variants:
//! - Launch(String) - browser process or tab creation failed
//! - Navigation(String) - page never reached a loaded state
//! - WaitTimeout(String) - an awaited condition never became true
//! - ElementNotFound(String) - an interaction target is missing from the DOM
//! - Input(String) - keyboard/mouse simulation failed
//! - Screenshot(String) - capture failed
//! - Evaluation(String) - in-page JavaScript failed
//!
//! Error messages should include context about the operation that failed.

pub use lookout_core::{LookoutError, Result};
