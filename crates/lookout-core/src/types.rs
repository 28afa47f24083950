//! Outcome and result types for scenario execution

use crate::LookoutError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Classification of a step failure
///
/// Assertion failures mean the application rendered the wrong state; every
/// other kind points at the environment (browser, network, target server).
/// The reporter relies on this split to tell "app is broken" apart from
/// "environment is flaky".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// An awaited condition never became true
    Timeout,
    /// The page did not reach a loaded state
    Navigation,
    /// An interaction target was missing from the DOM
    NotFound,
    /// Observed UI state differs from the expected state
    AssertionFailed,
    /// Anything the executor could not categorize
    Unexpected,
}

impl FailureKind {
    /// Whether this failure indicates a broken application rather than a
    /// broken environment
    pub fn is_assertion(&self) -> bool {
        matches!(self, Self::AssertionFailed)
    }

    /// The scenario status a failure of this kind produces
    pub fn status(&self) -> ScenarioStatus {
        if self.is_assertion() {
            ScenarioStatus::Failed
        } else {
            ScenarioStatus::Errored
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::Navigation => write!(f, "navigation"),
            Self::NotFound => write!(f, "not_found"),
            Self::AssertionFailed => write!(f, "assertion_failed"),
            Self::Unexpected => write!(f, "unexpected"),
        }
    }
}

impl std::str::FromStr for FailureKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "timeout" => Ok(Self::Timeout),
            "navigation" => Ok(Self::Navigation),
            "not_found" | "notfound" => Ok(Self::NotFound),
            "assertion_failed" | "assertionfailed" => Ok(Self::AssertionFailed),
            "unexpected" => Ok(Self::Unexpected),
            _ => Err(format!("Invalid failure kind: {}", s)),
        }
    }
}

impl From<&LookoutError> for FailureKind {
    fn from(err: &LookoutError) -> Self {
        match err {
            LookoutError::WaitTimeout(_) => Self::Timeout,
            LookoutError::Navigation(_) => Self::Navigation,
            LookoutError::ElementNotFound(_) => Self::NotFound,
            LookoutError::Assertion(_) => Self::AssertionFailed,
            _ => Self::Unexpected,
        }
    }
}

/// Outcome of executing a single step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Success,
    Failure {
        kind: FailureKind,
        message: String,
        elapsed_ms: u64,
    },
}

impl StepOutcome {
    /// Build a failure outcome from an error
    pub fn failure(err: &LookoutError, elapsed_ms: u64) -> Self {
        Self::Failure {
            kind: FailureKind::from(err),
            message: err.to_string(),
            elapsed_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Final status of a scenario run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    /// Every step succeeded
    Passed,
    /// An assertion step observed the wrong UI state
    Failed,
    /// An infrastructure failure ended the scenario
    Errored,
}

impl std::fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Passed => write!(f, "passed"),
            Self::Failed => write!(f, "failed"),
            Self::Errored => write!(f, "errored"),
        }
    }
}

/// Recorded outcome of running one scenario
///
/// Immutable once the scenario runner returns it. The harness controller
/// preserves input scenario order in the result sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Name of the scenario that produced this result
    pub scenario_name: String,
    /// Final status
    pub status: ScenarioStatus,
    /// Index of the first failing step (None for passed scenarios and for
    /// failures before any step ran, e.g. session acquisition)
    pub failing_step_index: Option<usize>,
    /// Failure classification for non-passed scenarios
    pub error_kind: Option<FailureKind>,
    /// Failure message for non-passed scenarios
    pub error_message: Option<String>,
    /// Screenshot artifacts written while the scenario ran
    pub screenshot_paths: Vec<PathBuf>,
    /// Wall-clock duration of the whole scenario run
    pub duration_ms: u64,
}

impl ScenarioResult {
    /// Result for a scenario whose steps all succeeded
    pub fn passed(name: impl Into<String>, screenshots: Vec<PathBuf>, duration_ms: u64) -> Self {
        Self {
            scenario_name: name.into(),
            status: ScenarioStatus::Passed,
            failing_step_index: None,
            error_kind: None,
            error_message: None,
            screenshot_paths: screenshots,
            duration_ms,
        }
    }

    /// Result for a scenario stopped by a failing step
    pub fn failed_at(
        name: impl Into<String>,
        step_index: usize,
        kind: FailureKind,
        message: impl Into<String>,
        screenshots: Vec<PathBuf>,
        duration_ms: u64,
    ) -> Self {
        Self {
            scenario_name: name.into(),
            status: kind.status(),
            failing_step_index: Some(step_index),
            error_kind: Some(kind),
            error_message: Some(message.into()),
            screenshot_paths: screenshots,
            duration_ms,
        }
    }

    /// Result for a scenario that never got a working browser session
    pub fn errored(name: impl Into<String>, message: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            scenario_name: name.into(),
            status: ScenarioStatus::Errored,
            failing_step_index: None,
            error_kind: Some(FailureKind::Unexpected),
            error_message: Some(message.into()),
            screenshot_paths: Vec::new(),
            duration_ms,
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status == ScenarioStatus::Passed
    }
}

/// Machine-readable aggregate of one harness run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Run identifier
    pub run_id: String,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Base URL the scenarios ran against
    pub base_url: String,
    /// Per-scenario results, in input order
    pub results: Vec<ScenarioResult>,
}

impl RunReport {
    pub fn new(base_url: impl Into<String>, results: Vec<ScenarioResult>) -> Self {
        Self {
            run_id: format!("run-{}", &Uuid::new_v4().to_string()[..8]),
            started_at: Utc::now(),
            base_url: base_url.into(),
            results,
        }
    }

    /// Render as pretty-printed JSON for CI log parsing
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
