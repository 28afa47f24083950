//! Harness configuration
//!
//! Configuration can be loaded from a TOML file; every field has a default
//! so a missing or partial file still yields a usable config. CLI flags
//! override file values.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{LookoutError, Result};

/// Harness-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Base URL of the application under test
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Directory screenshot artifacts and the run report are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Run the browser without a visible display surface
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// How many scenarios may run at once (1 = sequential)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Default timeout for navigation and wait steps
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u64,

    /// Browser viewport width
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    /// Browser viewport height
    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,
}

impl HarnessConfig {
    /// Load configuration from a TOML file, or use defaults if the file
    /// does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| {
                LookoutError::Config(format!("failed to parse {}: {}", path.display(), e))
            })
        } else {
            debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Write the default configuration to a TOML file
    pub fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(&Self::default())
            .map_err(|e| LookoutError::Config(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            output_dir: default_output_dir(),
            headless: default_headless(),
            concurrency: default_concurrency(),
            default_timeout_ms: default_timeout_ms(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
        }
    }
}

// Default value providers

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("verification")
}

fn default_headless() -> bool {
    true
}

fn default_concurrency() -> usize {
    1
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_viewport_width() -> u32 {
    1280
}

fn default_viewport_height() -> u32 {
    800
}
