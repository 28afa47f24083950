//! Harness controller
//!
//! Owns a whole suite run: every scenario gets a fresh session, failures
//! never spill across scenarios, and results come back in input order in
//! both execution modes.

use crate::runner::ScenarioRunner;
use lookout_core::{HarnessConfig, LookoutError, Result, Scenario, ScenarioResult};
use lookout_browser::SessionFactory;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Runs a scenario suite against sessions from a factory
pub struct Harness<F: SessionFactory + 'static> {
    config: HarnessConfig,
    factory: Arc<F>,
}

impl<F: SessionFactory + 'static> Harness<F> {
    pub fn new(config: HarnessConfig, factory: F) -> Self {
        Self {
            config,
            factory: Arc::new(factory),
        }
    }

    /// Verify a session can be acquired at all before the suite runs
    ///
    /// Acquires one session and releases it immediately. A failing probe
    /// means the whole run would be noise (every scenario would error for
    /// the same environmental reason), so callers should abort instead of
    /// producing a report.
    pub async fn preflight(&self) -> Result<()> {
        info!("Preflight: acquiring a probe session");
        let driver = self
            .factory
            .acquire()
            .await
            .map_err(|e| LookoutError::Launch(format!("preflight session failed: {}", e)))?;
        driver.close().await;
        info!("Preflight passed");
        Ok(())
    }

    /// Run every scenario, returning one result per scenario in input order
    pub async fn run_all(&self, scenarios: &[Scenario]) -> Vec<ScenarioResult> {
        if scenarios.is_empty() {
            return Vec::new();
        }
        if self.config.concurrency <= 1 {
            self.run_sequential(scenarios).await
        } else {
            self.run_parallel(scenarios).await
        }
    }

    async fn run_sequential(&self, scenarios: &[Scenario]) -> Vec<ScenarioResult> {
        info!("Running {} scenarios sequentially", scenarios.len());
        let runner = ScenarioRunner::new(&self.config);
        let mut results = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            results.push(runner.run(scenario, self.factory.as_ref()).await);
        }
        results
    }

    async fn run_parallel(&self, scenarios: &[Scenario]) -> Vec<ScenarioResult> {
        info!(
            "Running {} scenarios with concurrency {}",
            scenarios.len(),
            self.config.concurrency
        );

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let mut tasks = JoinSet::new();

        for (index, scenario) in scenarios.iter().cloned().enumerate() {
            let factory = Arc::clone(&self.factory);
            let semaphore = Arc::clone(&semaphore);
            let runner = ScenarioRunner::new(&self.config);
            tasks.spawn(async move {
                // Never closed, so acquisition only fails if the semaphore
                // is dropped; holding the Option keeps the permit alive
                let _permit = semaphore.acquire_owned().await.ok();
                let result = runner.run(&scenario, factory.as_ref()).await;
                (index, result)
            });
        }

        // Tasks finish in arbitrary order; index-addressed slots restore
        // input order
        let mut slots: Vec<Option<ScenarioResult>> = vec![None; scenarios.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => warn!("Scenario task did not complete: {}", e),
            }
        }

        scenarios
            .iter()
            .zip(slots)
            .map(|(scenario, slot)| {
                slot.unwrap_or_else(|| {
                    ScenarioResult::errored(
                        &scenario.name,
                        "scenario task aborted before producing a result",
                        0,
                    )
                })
            })
            .collect()
    }
}
