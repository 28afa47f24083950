//! # lookout-core
//!
//! Core types for the Lookout UI verification harness.
//!
//! Lookout drives a headless browser through declarative verification
//! scenarios against a running web application. This crate holds the pure
//! data model shared by every other crate:
//!
//! - Steps and scenarios (what to verify)
//! - Step outcomes and scenario results (what happened)
//! - The unified error taxonomy
//! - Harness configuration

mod config;
mod error;
mod scenario;
mod types;

pub use config::HarnessConfig;
pub use error::{LookoutError, Result};
pub use scenario::{load_suite, parse_suite, resolve_url, Scenario, Step};
pub use types::{FailureKind, RunReport, ScenarioResult, ScenarioStatus, StepOutcome};
