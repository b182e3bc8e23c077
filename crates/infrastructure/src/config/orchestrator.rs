//! Update orchestrator configuration.

use application::OrchestratorConfig;
use serde::{Deserialize, Serialize};

/// Batch refresh settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorAppConfig {
    /// Locations refreshed at the same time (default: 1)
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Seconds between refreshes in watch mode (default: 60)
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

const fn default_max_concurrency() -> usize {
    1
}

const fn default_refresh_interval() -> u64 {
    60
}

impl Default for OrchestratorAppConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

impl OrchestratorAppConfig {
    /// Convert to the application layer's `OrchestratorConfig`
    #[must_use]
    pub fn to_orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            max_concurrency: self.max_concurrency.max(1),
        }
    }
}
