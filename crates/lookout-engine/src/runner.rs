//! Scenario runner
//!
//! Runs one scenario against one fresh session. The runner is infallible:
//! every possible failure is folded into the returned [`ScenarioResult`],
//! and the session is released on every path before the result is
//! returned.

use crate::executor::{execute_step, StepContext};
use lookout_core::{FailureKind, HarnessConfig, Scenario, ScenarioResult, StepOutcome};
use lookout_browser::SessionFactory;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Executes scenarios one at a time against sessions from a factory
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base_url: String,
    artifact_dir: PathBuf,
    default_timeout: Duration,
}

impl ScenarioRunner {
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            artifact_dir: config.output_dir.clone(),
            default_timeout: Duration::from_millis(config.default_timeout_ms),
        }
    }

    /// Run a scenario to completion
    ///
    /// Steps run strictly in order; the first failing step ends the
    /// scenario and no later step runs. A scenario with no steps passes
    /// trivially (the session must still be acquirable).
    pub async fn run(&self, scenario: &Scenario, factory: &dyn SessionFactory) -> ScenarioResult {
        let started = Instant::now();
        info!("Running scenario: {}", scenario.name);

        let driver = match factory.acquire().await {
            Ok(driver) => driver,
            Err(e) => {
                let message = format!("session acquisition failed: {}", e);
                warn!("[{}] {}", scenario.name, message);
                return ScenarioResult::errored(
                    &scenario.name,
                    message,
                    started.elapsed().as_millis() as u64,
                );
            }
        };

        let ctx = StepContext {
            scenario_slug: scenario.slug(),
            artifact_dir: self.artifact_dir.clone(),
            base_url: self.base_url.clone(),
            default_timeout: self.default_timeout,
        };

        let mut screenshots = Vec::new();
        let mut failure: Option<(usize, FailureKind, String)> = None;

        for (index, step) in scenario.steps.iter().enumerate() {
            info!("[{}] step {}: {}", scenario.name, index, step.describe());

            let executed = execute_step(driver.as_ref(), &ctx, index, step).await;
            if let Some(path) = executed.screenshot {
                screenshots.push(path);
            }
            match executed.outcome {
                StepOutcome::Success => {}
                StepOutcome::Failure {
                    kind,
                    message,
                    elapsed_ms,
                } => {
                    warn!(
                        "[{}] step {} failed after {}ms: {}",
                        scenario.name, index, elapsed_ms, message
                    );
                    failure = Some((index, kind, message));
                    break;
                }
            }
        }

        driver.close().await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match failure {
            None => {
                info!("Scenario passed: {} ({}ms)", scenario.name, duration_ms);
                ScenarioResult::passed(&scenario.name, screenshots, duration_ms)
            }
            Some((index, kind, message)) => ScenarioResult::failed_at(
                &scenario.name,
                index,
                kind,
                message,
                screenshots,
                duration_ms,
            ),
        }
    }
}
