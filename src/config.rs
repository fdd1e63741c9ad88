//! Configuration for expansion and for running generated cases.
//!
//! Everything has a working default; a YAML document can override any
//! subset of fields:
//!
//! ```yaml
//! expansion:
//!   test_prefix: test
//!   separator: XSEPX
//! runner:
//!   filter: addition
//!   use_colors: false
//!   fail_fast: false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigurationError;
use crate::naming::{SeparatorToken, TEST_PREFIX};

/// Settings that shape generated member names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Members whose names start with this prefix are tests.
    pub test_prefix: String,
    /// Token spliced into index-based names; random per process by default.
    pub separator: SeparatorToken,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            test_prefix: TEST_PREFIX.to_string(),
            separator: SeparatorToken::process(),
        }
    }
}

impl ExpansionConfig {
    /// Default settings with a fixed separator, for reproducible names.
    pub fn with_separator(separator: SeparatorToken) -> Self {
        Self {
            separator,
            ..Self::default()
        }
    }

    pub fn is_test_name(&self, name: &str) -> bool {
        name.starts_with(&self.test_prefix)
    }
}

/// Settings for [`CaseRunner`](crate::runner::CaseRunner) and reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Case-insensitive substring a test ID must contain to run.
    pub filter: Option<String>,
    pub use_colors: bool,
    /// Skip the remaining cases after the first failure.
    pub fail_fast: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            filter: None,
            use_colors: atty::is(atty::Stream::Stderr),
            fail_fast: false,
        }
    }
}

impl RunnerConfig {
    /// Returns why `test_id` is filtered out, if it is.
    pub fn skip_reason(&self, test_id: &str) -> Option<String> {
        let filter = self.filter.as_deref()?;
        if test_id.to_lowercase().contains(&filter.to_lowercase()) {
            None
        } else {
            Some(format!("filtered out by substring: {filter}"))
        }
    }
}

/// Combined configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub expansion: ExpansionConfig,
    pub runner: RunnerConfig,
}

impl HarnessConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigurationError> {
        serde_yaml::from_str(text)
            .map_err(|e| ConfigurationError::data_format(format!("malformed configuration: {e}")))
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ConfigurationError::data_format(format!("failed to read '{}': {e}", path.display()))
        })?;
        Self::from_yaml_str(&text)
    }
}
