//! Scenario and step data model
//!
//! A scenario is a named, ordered sequence of steps. Steps are pure data;
//! no step holds a live resource. Suites are stored as JSON arrays of
//! scenarios so page flows are declarative values rather than ad-hoc
//! scripts.

use crate::{LookoutError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One atomic browser action or check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    /// Load a page. The URL may be absolute or a path resolved against the
    /// harness base URL.
    Navigate { url: String },

    /// Wait until the page body contains the given text
    WaitForText {
        text: String,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },

    /// Wait until the selector matches at least one element
    WaitForSelector {
        selector: String,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },

    /// Set a form field's value
    Fill { selector: String, value: String },

    /// Keyboard-level input, not tied to a selector
    Type {
        text: String,
        #[serde(default)]
        delay_ms: u64,
    },

    /// Click the first element matching the selector
    Click { selector: String },

    /// Move the mouse to viewport coordinates
    MoveMouse { x: f64, y: f64 },

    /// Fixed settle time. Prefer the wait steps: a fixed delay is either
    /// too short under load or wastefully long, so this is a known source
    /// of flakiness kept only for genuinely non-observable settling.
    Sleep { ms: u64 },

    /// Capture a screenshot artifact
    Screenshot {
        path: String,
        #[serde(default = "default_full_page")]
        full_page: bool,
    },

    /// Assert that the page body contains the expected text
    AssertText { expected: String },

    /// Assert how many elements match the selector
    AssertCount { selector: String, expected: usize },
}

fn default_full_page() -> bool {
    true
}

impl Step {
    /// Short human-readable description, used in logs and failure messages
    pub fn describe(&self) -> String {
        match self {
            Self::Navigate { url } => format!("navigate to {}", url),
            Self::WaitForText { text, .. } => format!("wait for text \"{}\"", text),
            Self::WaitForSelector { selector, .. } => {
                format!("wait for selector \"{}\"", selector)
            }
            Self::Fill { selector, .. } => format!("fill \"{}\"", selector),
            Self::Type { text, .. } => format!("type {} characters", text.chars().count()),
            Self::Click { selector } => format!("click \"{}\"", selector),
            Self::MoveMouse { x, y } => format!("move mouse to ({}, {})", x, y),
            Self::Sleep { ms } => format!("sleep {}ms", ms),
            Self::Screenshot { path, .. } => format!("screenshot \"{}\"", path),
            Self::AssertText { expected } => format!("assert text \"{}\"", expected),
            Self::AssertCount { selector, expected } => {
                format!("assert {} elements match \"{}\"", expected, selector)
            }
        }
    }
}

/// A named, ordered sequence of verification steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name; must be non-empty and unique within a suite
    pub name: String,
    /// Steps, executed strictly in order
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }

    /// Filesystem-safe form of the name, used to prefix artifact filenames
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

/// Lowercase the input and collapse any non-alphanumeric run into a single
/// dash
pub(crate) fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Resolve a step URL against the harness base URL
///
/// Absolute URLs pass through untouched; anything else is treated as a
/// path under the base.
pub fn resolve_url(base_url: &str, target: &str) -> String {
    if target.starts_with("http://") || target.starts_with("https://") {
        return target.to_string();
    }
    let base = base_url.trim_end_matches('/');
    let path = target.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

/// Parse a scenario suite from JSON
///
/// Rejects scenarios with empty names and duplicate names; duplicates
/// would silently collide on screenshot artifact filenames.
pub fn parse_suite(json: &str) -> Result<Vec<Scenario>> {
    let scenarios: Vec<Scenario> = serde_json::from_str(json)?;

    let mut seen = HashSet::new();
    for scenario in &scenarios {
        if scenario.name.trim().is_empty() {
            return Err(LookoutError::Scenario(
                "scenario name must not be empty".to_string(),
            ));
        }
        if !seen.insert(scenario.name.clone()) {
            return Err(LookoutError::Scenario(format!(
                "duplicate scenario name: {}",
                scenario.name
            )));
        }
    }

    Ok(scenarios)
}

/// Load a scenario suite from a JSON file
pub fn load_suite(path: &Path) -> Result<Vec<Scenario>> {
    tracing::debug!("Loading scenario suite from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|e| {
        LookoutError::Scenario(format!("cannot read suite {}: {}", path.display(), e))
    })?;
    parse_suite(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUITE: &str = r#"[
        {
            "name": "landing page",
            "steps": [
                {"type": "navigate", "url": "/"},
                {"type": "wait_for_text", "text": "Welcome", "timeout_ms": 5000},
                {"type": "screenshot", "path": "landing.png"}
            ]
        },
        {
            "name": "uuid generator",
            "steps": [
                {"type": "navigate", "url": "/generate-uuid"},
                {"type": "click", "selector": "button.is-primary"},
                {"type": "assert_count", "selector": "ul.result-list li", "expected": 1}
            ]
        }
    ]"#;

    #[test]
    fn test_parse_suite() {
        let suite = parse_suite(SUITE).unwrap();
        assert_eq!(suite.len(), 2);
        assert_eq!(suite[0].name, "landing page");
        assert_eq!(suite[0].steps.len(), 3);
        assert_eq!(
            suite[0].steps[0],
            Step::Navigate {
                url: "/".to_string()
            }
        );
        match &suite[0].steps[2] {
            Step::Screenshot { path, full_page } => {
                assert_eq!(path, "landing.png");
                // full_page defaults to true when omitted
                assert!(full_page);
            }
            other => panic!("unexpected step: {:?}", other),
        }
        match &suite[1].steps[2] {
            Step::AssertCount { expected, .. } => assert_eq!(*expected, 1),
            other => panic!("unexpected step: {:?}", other),
        }
    }

    #[test]
    fn test_parse_suite_rejects_empty_name() {
        let err = parse_suite(r#"[{"name": "  ", "steps": []}]"#).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_parse_suite_rejects_duplicate_names() {
        let json = r#"[{"name": "a", "steps": []}, {"name": "a", "steps": []}]"#;
        let err = parse_suite(json).unwrap_err();
        assert!(err.to_string().contains("duplicate scenario name"));
    }

    #[test]
    fn test_empty_steps_allowed() {
        let suite = parse_suite(r#"[{"name": "degenerate"}]"#).unwrap();
        assert!(suite[0].steps.is_empty());
    }

    #[test]
    fn test_slug() {
        assert_eq!(Scenario::new("Landing Page", vec![]).slug(), "landing-page");
        assert_eq!(Scenario::new("QR  Code!", vec![]).slug(), "qr-code");
        assert_eq!(Scenario::new("tts", vec![]).slug(), "tts");
    }

    #[test]
    fn test_resolve_url() {
        let base = "http://localhost:3000";
        assert_eq!(resolve_url(base, "/qr-code"), "http://localhost:3000/qr-code");
        assert_eq!(resolve_url(base, "qr-code"), "http://localhost:3000/qr-code");
        assert_eq!(resolve_url(base, "/"), "http://localhost:3000");
        assert_eq!(
            resolve_url(base, "https://example.com/x"),
            "https://example.com/x"
        );
        assert_eq!(
            resolve_url("http://localhost:3000/", "/a/b"),
            "http://localhost:3000/a/b"
        );
    }

    #[test]
    fn test_step_describe() {
        let step = Step::WaitForText {
            text: "Welcome".to_string(),
            timeout_ms: None,
        };
        assert_eq!(step.describe(), "wait for text \"Welcome\"");

        let step = Step::AssertCount {
            selector: "li".to_string(),
            expected: 5,
        };
        assert_eq!(step.describe(), "assert 5 elements match \"li\"");
    }
}
