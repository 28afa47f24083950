//! Scenario execution engine for the Lookout UI verification harness
//!
//! The engine turns declarative scenarios into browser actions and a
//! machine-readable run report:
//!
//! - [`executor`]: executes one step against a page driver and classifies
//!   the outcome
//! - [`runner`]: runs one scenario to completion, stopping at the first
//!   failing step and always releasing the session
//! - [`harness`]: runs a whole suite, sequentially or with bounded
//!   parallelism, each scenario in a fresh session
//! - [`reporter`]: renders the human summary and maps a run onto a CI
//!   exit code
//!
//! The engine only depends on the [`lookout_browser::PageDriver`] and
//! [`lookout_browser::SessionFactory`] traits, so its behavior is fully
//! testable with in-memory fakes.

pub mod executor;
pub mod harness;
pub mod reporter;
pub mod runner;

// Re-export commonly used types
pub use executor::{ExecutedStep, StepContext};
pub use harness::Harness;
pub use reporter::{
    summarize, write_report, Summary, EXIT_ERRORED, EXIT_FAILED, EXIT_LAUNCH_FAILURE, EXIT_PASSED,
};
pub use runner::ScenarioRunner;
