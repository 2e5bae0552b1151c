//! Session configuration, loaded from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};
use stagehand_diff::ImageEndpoint;

use crate::error::{WorkflowError, WorkflowResult};

/// Configuration for one staging session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StagingConfig {
    /// Repository the session works on, as the backend knows it.
    pub repo_path: String,
    /// Base address image versions are served from.
    pub image_diff_endpoint: String,
    /// Upper bound on diff fetches in flight during one refresh.
    pub max_concurrent_diff_fetches: usize,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            repo_path: ".".to_string(),
            image_diff_endpoint: "/api/diff/image".to_string(),
            max_concurrent_diff_fetches: 8,
        }
    }
}

impl StagingConfig {
    pub fn for_repo(repo_path: impl Into<String>) -> Self {
        Self {
            repo_path: repo_path.into(),
            ..Self::default()
        }
    }

    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> WorkflowResult<Self> {
        toml::from_str(s).map_err(|e| WorkflowError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> WorkflowResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> WorkflowResult<String> {
        toml::to_string(self).map_err(|e| WorkflowError::Config(e.to_string()))
    }

    pub fn image_endpoint(&self) -> ImageEndpoint {
        ImageEndpoint::new(self.image_diff_endpoint.clone(), self.repo_path.clone())
    }

    /// Fetch concurrency, never below one.
    pub fn fetch_limit(&self) -> usize {
        self.max_concurrent_diff_fetches.max(1)
    }
}
