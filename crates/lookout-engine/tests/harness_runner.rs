//! End-to-end engine tests against an in-memory page driver
//!
//! The fake driver simulates a page with fixed body text, element counts,
//! and a set of missing selectors, so every failure mode the runner and
//! harness must handle can be provoked deterministically.

use async_trait::async_trait;
use lookout_browser::{PageDriver, SessionFactory};
use lookout_core::{
    FailureKind, HarnessConfig, LookoutError, Result, Scenario, ScenarioStatus, Step,
};
use lookout_engine::{summarize, Harness};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Shared, fixed "page" the fake driver serves
#[derive(Debug, Clone, Default)]
struct FakePage {
    body: String,
    counts: HashMap<String, usize>,
    missing: HashSet<String>,
}

struct FakeDriver {
    page: FakePage,
    calls: Arc<Mutex<Vec<String>>>,
    closes: Arc<AtomicUsize>,
}

impl FakeDriver {
    fn log(&self, entry: impl Into<String>) {
        self.calls.lock().unwrap().push(entry.into());
    }
}

#[async_trait]
impl PageDriver for FakeDriver {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.log(format!("navigate {}", url));
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, _timeout: Option<Duration>) -> Result<()> {
        self.log(format!("wait_for_selector {}", selector));
        if self.page.missing.contains(selector) {
            return Err(LookoutError::WaitTimeout(format!(
                "selector \"{}\"",
                selector
            )));
        }
        Ok(())
    }

    async fn wait_for_text(&self, text: &str, _timeout: Option<Duration>) -> Result<()> {
        self.log(format!("wait_for_text {}", text));
        if !self.page.body.contains(text) {
            return Err(LookoutError::WaitTimeout(format!("text \"{}\"", text)));
        }
        Ok(())
    }

    async fn fill(&self, selector: &str, _value: &str) -> Result<()> {
        self.log(format!("fill {}", selector));
        if self.page.missing.contains(selector) {
            return Err(LookoutError::ElementNotFound(selector.to_string()));
        }
        Ok(())
    }

    async fn type_text(&self, text: &str, _delay_ms: u64) -> Result<()> {
        self.log(format!("type {}", text));
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.log(format!("click {}", selector));
        if self.page.missing.contains(selector) {
            return Err(LookoutError::ElementNotFound(selector.to_string()));
        }
        Ok(())
    }

    async fn move_mouse(&self, x: f64, y: f64) -> Result<()> {
        self.log(format!("move_mouse {} {}", x, y));
        Ok(())
    }

    async fn capture_screenshot(&self, _full_page: bool) -> Result<Vec<u8>> {
        self.log("screenshot");
        // PNG signature is enough for tests that read the file back
        Ok(vec![0x89, b'P', b'N', b'G'])
    }

    async fn body_text(&self) -> Result<String> {
        self.log("body_text");
        Ok(self.page.body.clone())
    }

    async fn count_elements(&self, selector: &str) -> Result<usize> {
        self.log(format!("count {}", selector));
        Ok(self.page.counts.get(selector).copied().unwrap_or(0))
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Factory handing out fake drivers, with scripted acquisition failures
struct FakeFactory {
    page: FakePage,
    fail_acquire_on: HashSet<usize>,
    acquired: AtomicUsize,
    calls: Arc<Mutex<Vec<String>>>,
    closes: Arc<AtomicUsize>,
}

impl FakeFactory {
    fn with_body(body: &str) -> Self {
        Self {
            page: FakePage {
                body: body.to_string(),
                ..FakePage::default()
            },
            fail_acquire_on: HashSet::new(),
            acquired: AtomicUsize::new(0),
            calls: Arc::new(Mutex::new(Vec::new())),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn with_count(mut self, selector: &str, count: usize) -> Self {
        self.page.counts.insert(selector.to_string(), count);
        self
    }

    fn with_missing(mut self, selector: &str) -> Self {
        self.page.missing.insert(selector.to_string());
        self
    }

    fn fail_acquire(mut self, nth: usize) -> Self {
        self.fail_acquire_on.insert(nth);
        self
    }

    fn handles(&self) -> (Arc<Mutex<Vec<String>>>, Arc<AtomicUsize>) {
        (Arc::clone(&self.calls), Arc::clone(&self.closes))
    }
}

#[async_trait]
impl SessionFactory for FakeFactory {
    async fn acquire(&self) -> Result<Box<dyn PageDriver>> {
        let n = self.acquired.fetch_add(1, Ordering::SeqCst);
        if self.fail_acquire_on.contains(&n) {
            return Err(LookoutError::Launch("browser refused to start".to_string()));
        }
        Ok(Box::new(FakeDriver {
            page: self.page.clone(),
            calls: Arc::clone(&self.calls),
            closes: Arc::clone(&self.closes),
        }))
    }
}

fn config(output_dir: PathBuf, concurrency: usize) -> HarnessConfig {
    HarnessConfig {
        base_url: "http://test.local".to_string(),
        output_dir,
        concurrency,
        ..HarnessConfig::default()
    }
}

fn test_config(concurrency: usize) -> HarnessConfig {
    config(std::env::temp_dir(), concurrency)
}

#[tokio::test]
async fn test_empty_scenario_passes() {
    let factory = FakeFactory::with_body("");
    let (_, closes) = factory.handles();
    let harness = Harness::new(test_config(1), factory);

    let results = harness
        .run_all(&[Scenario::new("degenerate", vec![])])
        .await;

    assert_eq!(results.len(), 1);
    assert!(results[0].is_passed());
    // The session is still acquired and released
    assert_eq!(closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_first_failure_stops_scenario() {
    let factory = FakeFactory::with_body("Welcome").with_missing("#gone");
    let (calls, closes) = factory.handles();
    let harness = Harness::new(test_config(1), factory);

    let scenario = Scenario::new(
        "stops early",
        vec![
            Step::Navigate {
                url: "/".to_string(),
            },
            Step::Click {
                selector: "#gone".to_string(),
            },
            Step::AssertText {
                expected: "Welcome".to_string(),
            },
        ],
    );

    let results = harness.run_all(&[scenario]).await;

    assert_eq!(results[0].status, ScenarioStatus::Errored);
    assert_eq!(results[0].failing_step_index, Some(1));
    assert_eq!(results[0].error_kind, Some(FailureKind::NotFound));

    // The assertion step after the failure never ran
    let log = calls.lock().unwrap();
    assert!(log.iter().any(|c| c.starts_with("navigate")));
    assert!(!log.iter().any(|c| c == "body_text"));
    drop(log);

    // Session released exactly once despite the failure
    assert_eq!(closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_navigate_resolves_relative_urls() {
    let factory = FakeFactory::with_body("");
    let (calls, _) = factory.handles();
    let harness = Harness::new(test_config(1), factory);

    let scenario = Scenario::new(
        "relative",
        vec![Step::Navigate {
            url: "/qr-code".to_string(),
        }],
    );
    let results = harness.run_all(&[scenario]).await;

    assert!(results[0].is_passed());
    let log = calls.lock().unwrap();
    assert_eq!(log[0], "navigate http://test.local/qr-code");
}

#[tokio::test]
async fn test_wait_timeout_is_errored_not_failed() {
    let factory = FakeFactory::with_body("something else");
    let harness = Harness::new(test_config(1), factory);

    let scenario = Scenario::new(
        "times out",
        vec![
            Step::Navigate {
                url: "/".to_string(),
            },
            Step::WaitForText {
                text: "Welcome".to_string(),
                timeout_ms: Some(50),
            },
        ],
    );
    let results = harness.run_all(&[scenario]).await;

    assert_eq!(results[0].status, ScenarioStatus::Errored);
    assert_eq!(results[0].error_kind, Some(FailureKind::Timeout));
    assert_eq!(results[0].failing_step_index, Some(1));
}

#[tokio::test]
async fn test_assertion_failure_is_failed() {
    let factory = FakeFactory::with_body("Welcome").with_count("ul li", 1);
    let harness = Harness::new(test_config(1), factory);

    let scenario = Scenario::new(
        "wrong count",
        vec![
            Step::Navigate {
                url: "/".to_string(),
            },
            Step::AssertText {
                expected: "Welcome".to_string(),
            },
            Step::AssertCount {
                selector: "ul li".to_string(),
                expected: 3,
            },
        ],
    );
    let results = harness.run_all(&[scenario]).await;

    assert_eq!(results[0].status, ScenarioStatus::Failed);
    assert_eq!(results[0].error_kind, Some(FailureKind::AssertionFailed));
    assert_eq!(results[0].failing_step_index, Some(2));
    let message = results[0].error_message.as_deref().unwrap();
    assert!(message.contains("expected 3 elements"));
    assert!(message.contains("found 1"));
}

#[tokio::test]
async fn test_acquisition_failure_is_isolated() {
    let factory = FakeFactory::with_body("Welcome").fail_acquire(1);
    let harness = Harness::new(test_config(1), factory);

    let suite = vec![
        Scenario::new("first", vec![]),
        Scenario::new("second", vec![]),
        Scenario::new("third", vec![]),
    ];
    let results = harness.run_all(&suite).await;

    assert_eq!(results.len(), 3);
    assert!(results[0].is_passed());
    assert_eq!(results[1].status, ScenarioStatus::Errored);
    assert!(results[1].failing_step_index.is_none());
    assert!(results[1]
        .error_message
        .as_deref()
        .unwrap()
        .contains("session acquisition failed"));
    assert!(results[2].is_passed());
}

#[tokio::test]
async fn test_parallel_preserves_input_order() {
    let factory = FakeFactory::with_body("ok");
    let (_, closes) = factory.handles();
    let harness = Harness::new(test_config(2), factory);

    let suite: Vec<Scenario> = (0..5)
        .map(|i| {
            Scenario::new(
                format!("scenario-{}", i),
                vec![Step::AssertText {
                    expected: "ok".to_string(),
                }],
            )
        })
        .collect();
    let results = harness.run_all(&suite).await;

    assert_eq!(results.len(), 5);
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.scenario_name, format!("scenario-{}", i));
        assert!(result.is_passed());
    }
    // One session per scenario, each released
    assert_eq!(closes.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_screenshot_artifacts_do_not_collide() {
    let dir = tempfile::tempdir().unwrap();
    let factory = FakeFactory::with_body("");
    let harness = Harness::new(config(dir.path().to_path_buf(), 1), factory);

    let suite = vec![
        Scenario::new(
            "alpha",
            vec![Step::Screenshot {
                path: "shot.png".to_string(),
                full_page: true,
            }],
        ),
        Scenario::new(
            "beta",
            vec![Step::Screenshot {
                path: "shot.png".to_string(),
                full_page: true,
            }],
        ),
    ];
    let results = harness.run_all(&suite).await;

    assert!(results[0].is_passed());
    assert!(results[1].is_passed());
    let a = &results[0].screenshot_paths[0];
    let b = &results[1].screenshot_paths[0];
    assert_ne!(a, b);
    assert!(a.file_name().unwrap().to_str().unwrap().starts_with("alpha-00-"));
    assert!(b.file_name().unwrap().to_str().unwrap().starts_with("beta-00-"));

    // Artifacts actually exist on disk with the captured bytes
    assert_eq!(std::fs::read(a).unwrap(), vec![0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn test_preflight_probe() {
    let factory = FakeFactory::with_body("");
    let (_, closes) = factory.handles();
    let harness = Harness::new(test_config(1), factory);

    harness.preflight().await.unwrap();
    assert_eq!(closes.load(Ordering::SeqCst), 1);

    let failing = FakeFactory::with_body("").fail_acquire(0);
    let harness = Harness::new(test_config(1), failing);
    let err = harness.preflight().await.unwrap_err();
    assert!(err.to_string().contains("preflight session failed"));
}

#[tokio::test]
async fn test_summary_exit_code_from_mixed_run() {
    let factory = FakeFactory::with_body("ok").fail_acquire(1);
    let harness = Harness::new(test_config(1), factory);

    let suite = vec![
        Scenario::new(
            "passes",
            vec![Step::AssertText {
                expected: "ok".to_string(),
            }],
        ),
        Scenario::new("cannot start", vec![]),
    ];
    let results = harness.run_all(&suite).await;
    let report = lookout_core::RunReport::new("http://test.local", results);
    let summary = summarize(&report);

    assert_eq!(summary.exit_code, lookout_engine::EXIT_ERRORED);
    assert!(summary.text.contains("passes"));
    assert!(summary.text.contains("cannot start"));
}
