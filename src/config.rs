//! Paginator configuration
//!
//! Configuration can be built in code or loaded from YAML:
//!
//! ```yaml
//! page_policy: strict
//! link_style: route
//! default_limit: 25
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Policies
// ============================================================================

/// How page numbers are validated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PagePolicy {
    /// Any page is accepted; `page <= 0` is treated as the first page
    #[default]
    Lenient,
    /// `page` must be greater than 0
    Strict,
}

/// How next/previous neighbours are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LinkStyle {
    /// Route links when the request carries a route, numbers otherwise
    #[default]
    Auto,
    /// Plain page numbers, even when a route is given
    Number,
    /// `"{route}?page={n}"` strings built from the request's route
    Route,
}

// ============================================================================
// Paginator Config
// ============================================================================

/// Configuration shared by every call made through a `Paginator`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatorConfig {
    /// Page validation policy
    #[serde(default)]
    pub page_policy: PagePolicy,

    /// Neighbour link style
    #[serde(default)]
    pub link_style: LinkStyle,

    /// Page size used by callers that do not specify one
    #[serde(default = "default_limit")]
    pub default_limit: u64,
}

fn default_limit() -> u64 {
    10
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            page_policy: PagePolicy::default(),
            link_style: LinkStyle::default(),
            default_limit: default_limit(),
        }
    }
}

impl PaginatorConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page validation policy
    #[must_use]
    pub fn with_page_policy(mut self, policy: PagePolicy) -> Self {
        self.page_policy = policy;
        self
    }

    /// Set the neighbour link style
    #[must_use]
    pub fn with_link_style(mut self, style: LinkStyle) -> Self {
        self.link_style = style;
        self
    }

    /// Set the default page size
    #[must_use]
    pub fn with_default_limit(mut self, limit: u64) -> Self {
        self.default_limit = limit;
        self
    }

    /// Parse a config from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /// Load a config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Check the values that serde cannot enforce
    pub fn check(&self) -> Result<()> {
        if self.default_limit == 0 {
            return Err(Error::invalid_config(
                "default_limit",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}
