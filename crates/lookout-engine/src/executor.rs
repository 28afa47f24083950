//! Step execution against a page driver
//!
//! Exactly one `PageDriver` call per step; the executor's job is mapping
//! step data onto driver calls, timing the call, and classifying any
//! error into a [`StepOutcome`]. It never decides what happens next, that
//! is the scenario runner's call.

use lookout_core::{resolve_url, LookoutError, Result, Step, StepOutcome};
use lookout_browser::PageDriver;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

/// Per-scenario inputs the executor needs for every step
#[derive(Debug, Clone)]
pub struct StepContext {
    /// Slug of the running scenario, used to prefix artifact filenames
    pub scenario_slug: String,
    /// Directory screenshot artifacts are written to
    pub artifact_dir: PathBuf,
    /// Base URL relative navigation targets resolve against
    pub base_url: String,
    /// Timeout for wait steps that do not carry their own
    pub default_timeout: Duration,
}

/// What executing one step produced
#[derive(Debug)]
pub struct ExecutedStep {
    /// Success, or a classified failure
    pub outcome: StepOutcome,
    /// Screenshot artifact written by this step, if any
    pub screenshot: Option<PathBuf>,
}

/// Execute a single step, classifying any error into an outcome
pub async fn execute_step(
    driver: &dyn PageDriver,
    ctx: &StepContext,
    index: usize,
    step: &Step,
) -> ExecutedStep {
    let started = Instant::now();
    match run_step(driver, ctx, index, step).await {
        Ok(screenshot) => ExecutedStep {
            outcome: StepOutcome::Success,
            screenshot,
        },
        Err(e) => ExecutedStep {
            outcome: StepOutcome::failure(&e, started.elapsed().as_millis() as u64),
            screenshot: None,
        },
    }
}

async fn run_step(
    driver: &dyn PageDriver,
    ctx: &StepContext,
    index: usize,
    step: &Step,
) -> Result<Option<PathBuf>> {
    match step {
        Step::Navigate { url } => {
            driver.navigate(&resolve_url(&ctx.base_url, url)).await?;
        }
        Step::WaitForText { text, timeout_ms } => {
            driver
                .wait_for_text(text, Some(step_timeout(*timeout_ms, ctx)))
                .await?;
        }
        Step::WaitForSelector {
            selector,
            timeout_ms,
        } => {
            driver
                .wait_for_selector(selector, Some(step_timeout(*timeout_ms, ctx)))
                .await?;
        }
        Step::Fill { selector, value } => {
            driver.fill(selector, value).await?;
        }
        Step::Type { text, delay_ms } => {
            driver.type_text(text, *delay_ms).await?;
        }
        Step::Click { selector } => {
            driver.click(selector).await?;
        }
        Step::MoveMouse { x, y } => {
            driver.move_mouse(*x, *y).await?;
        }
        Step::Sleep { ms } => {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }
        Step::Screenshot { path, full_page } => {
            let data = driver.capture_screenshot(*full_page).await?;
            tokio::fs::create_dir_all(&ctx.artifact_dir).await.map_err(|e| {
                LookoutError::Screenshot(format!(
                    "cannot create {}: {}",
                    ctx.artifact_dir.display(),
                    e
                ))
            })?;
            let target = ctx.artifact_dir.join(artifact_file_name(
                &ctx.scenario_slug,
                index,
                path,
            ));
            tokio::fs::write(&target, &data).await.map_err(|e| {
                LookoutError::Screenshot(format!("cannot write {}: {}", target.display(), e))
            })?;
            debug!("Wrote screenshot {} ({} bytes)", target.display(), data.len());
            return Ok(Some(target));
        }
        Step::AssertText { expected } => {
            let body = driver.body_text().await?;
            if !body.contains(expected.as_str()) {
                return Err(LookoutError::Assertion(format!(
                    "expected page body to contain \"{}\"",
                    expected
                )));
            }
        }
        Step::AssertCount { selector, expected } => {
            let found = driver.count_elements(selector).await?;
            if found != *expected {
                return Err(LookoutError::Assertion(format!(
                    "expected {} elements matching \"{}\", found {}",
                    expected, selector, found
                )));
            }
        }
    }
    Ok(None)
}

fn step_timeout(step_ms: Option<u64>, ctx: &StepContext) -> Duration {
    step_ms.map_or(ctx.default_timeout, Duration::from_millis)
}

/// Artifact filename for a screenshot step
///
/// Prefixing with the scenario slug and step index keeps artifacts from
/// different scenarios (and repeated steps) from colliding in the shared
/// output directory. Only the basename of the requested path is used.
pub fn artifact_file_name(scenario_slug: &str, step_index: usize, requested: &str) -> String {
    let base = Path::new(requested)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("screenshot.png");
    format!("{}-{:02}-{}", scenario_slug, step_index, base)
}
