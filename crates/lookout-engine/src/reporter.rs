//! Run reporting and exit-code mapping
//!
//! The exit code is the CI contract: 0 all passed, 1 at least one
//! assertion failure, 2 at least one infrastructure error. Errors take
//! precedence over failures because a run with broken environment cannot
//! vouch for the scenarios that did pass. Exit code 3 is reserved for
//! the caller to signal that the browser never launched and no report
//! exists.

use lookout_core::{LookoutError, Result, RunReport, ScenarioStatus};
use std::path::{Path, PathBuf};
use tracing::info;

/// Every scenario passed
pub const EXIT_PASSED: i32 = 0;
/// At least one scenario observed wrong UI state
pub const EXIT_FAILED: i32 = 1;
/// At least one scenario hit an infrastructure error
pub const EXIT_ERRORED: i32 = 2;
/// The browser could not be launched at all; no scenarios ran
pub const EXIT_LAUNCH_FAILURE: i32 = 3;

/// Rendered outcome of a run
#[derive(Debug, Clone)]
pub struct Summary {
    /// Process exit code for the run
    pub exit_code: i32,
    /// Human-readable multi-line summary
    pub text: String,
}

/// Render a run report into a summary and its exit code
pub fn summarize(report: &RunReport) -> Summary {
    let mut passed = 0usize;
    let mut failed = 0usize;
    let mut errored = 0usize;

    let mut text = format!("Run {} against {}\n", report.run_id, report.base_url);

    for result in &report.results {
        match result.status {
            ScenarioStatus::Passed => passed += 1,
            ScenarioStatus::Failed => failed += 1,
            ScenarioStatus::Errored => errored += 1,
        }

        text.push_str(&format!(
            "  {:<7}  {} ({}ms)\n",
            result.status, result.scenario_name, result.duration_ms
        ));

        if let Some(ref message) = result.error_message {
            match result.failing_step_index {
                Some(index) => {
                    text.push_str(&format!("           step {}: {}\n", index, message))
                }
                None => text.push_str(&format!("           {}\n", message)),
            }
        }
    }

    text.push_str(&format!(
        "\n{} scenarios: {} passed, {} failed, {} errored\n",
        report.results.len(),
        passed,
        failed,
        errored
    ));

    let exit_code = if errored > 0 {
        EXIT_ERRORED
    } else if failed > 0 {
        EXIT_FAILED
    } else {
        EXIT_PASSED
    };

    Summary { exit_code, text }
}

/// Write the machine-readable report as `report.json` in the output
/// directory, returning the path written
pub async fn write_report(report: &RunReport, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join("report.json");
    let json = report.to_json()?;
    tokio::fs::write(&path, json).await.map_err(|e| {
        LookoutError::Config(format!("cannot write report {}: {}", path.display(), e))
    })?;
    info!("Wrote run report to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookout_core::{FailureKind, ScenarioResult};

    fn report(results: Vec<ScenarioResult>) -> RunReport {
        RunReport::new("http://localhost:3000", results)
    }

    #[test]
    fn test_all_passed_exit_zero() {
        let summary = summarize(&report(vec![
            ScenarioResult::passed("a", Vec::new(), 10),
            ScenarioResult::passed("b", Vec::new(), 20),
        ]));
        assert_eq!(summary.exit_code, EXIT_PASSED);
        assert!(summary.text.contains("2 scenarios: 2 passed, 0 failed, 0 errored"));
    }

    #[test]
    fn test_failure_exit_one() {
        let summary = summarize(&report(vec![
            ScenarioResult::passed("a", Vec::new(), 10),
            ScenarioResult::failed_at(
                "b",
                2,
                FailureKind::AssertionFailed,
                "expected \"Done\"",
                Vec::new(),
                30,
            ),
        ]));
        assert_eq!(summary.exit_code, EXIT_FAILED);
        assert!(summary.text.contains("step 2: expected \"Done\""));
    }

    #[test]
    fn test_error_takes_precedence_over_failure() {
        let summary = summarize(&report(vec![
            ScenarioResult::failed_at(
                "a",
                0,
                FailureKind::AssertionFailed,
                "wrong state",
                Vec::new(),
                5,
            ),
            ScenarioResult::errored("b", "session acquisition failed", 1),
        ]));
        assert_eq!(summary.exit_code, EXIT_ERRORED);
        assert!(summary.text.contains("0 passed, 1 failed, 1 errored"));
    }

    #[test]
    fn test_errored_without_step_index_prints_message() {
        let summary = summarize(&report(vec![ScenarioResult::errored(
            "a",
            "launch refused",
            3,
        )]));
        assert_eq!(summary.exit_code, EXIT_ERRORED);
        assert!(summary.text.contains("launch refused"));
        assert!(!summary.text.contains("step "));
    }

    #[tokio::test]
    async fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let report = report(vec![ScenarioResult::passed("a", Vec::new(), 10)]);
        let path = write_report(&report, dir.path()).await.unwrap();
        assert!(path.ends_with("report.json"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"scenario_name\": \"a\""));
    }
}
