//! # Ledger Agent Configuration
//!
//! Route templates, crawl bound and convergence quorum.
//!
//! ## Environment Variables
//!
//! | Variable | Default |
//! |----------|---------|
//! | `LA_BASE_URI` | `https://localhost:18443` |
//! | `LA_MAX_CRAWL_ATTEMPTS` | `20` |
//! | `LA_MIN_CONVERGENCE_NODES` | `1` |

use crate::algorithms::AGENT_ID_PLACEHOLDER;
use crate::domain::{DEFAULT_MAX_CRAWL_ATTEMPTS, MIN_CONVERGENCE_NODES};
use serde::{Deserialize, Serialize};
use std::env;

/// Base URI plus one route template per core service.
///
/// Every template except `agents` contains `:agentId`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RouteConfig {
    /// Server base URI, no trailing slash.
    pub base_uri: String,
    /// Agent collection route; the status service is `agents/<uuid>`.
    pub agents: String,
    /// Ledger configuration route.
    pub config: String,
    /// Operation submission route.
    pub operations: String,
    /// Event route.
    pub events: String,
    /// Block route.
    pub blocks: String,
    /// Query route.
    pub query: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self::with_base_uri("https://localhost:18443")
    }
}

impl RouteConfig {
    /// Default templates on a given base URI.
    pub fn with_base_uri(base_uri: impl Into<String>) -> Self {
        let agent = format!("/ledger-agents/{AGENT_ID_PLACEHOLDER}");
        Self {
            base_uri: base_uri.into().trim_end_matches('/').to_string(),
            agents: "/ledger-agents".to_string(),
            config: format!("{agent}/config"),
            operations: format!("{agent}/operations"),
            events: format!("{agent}/events"),
            blocks: format!("{agent}/blocks"),
            query: format!("{agent}/query"),
        }
    }
}

/// Chain verifier settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerifierConfig {
    /// Parent hops before a crawl gives up.
    pub max_attempts: u32,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_CRAWL_ATTEMPTS,
        }
    }
}

/// Convergence checker settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConvergenceConfig {
    /// Minimum number of nodes a check needs.
    pub min_nodes: usize,
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            min_nodes: MIN_CONVERGENCE_NODES,
        }
    }
}

/// Ledger agent configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerAgentConfig {
    /// Service routes.
    pub routes: RouteConfig,
    /// Crawl settings.
    pub verifier: VerifierConfig,
    /// Convergence settings.
    pub convergence: ConvergenceConfig,
}

impl LedgerAgentConfig {
    /// Create a config for testing.
    pub fn for_testing() -> Self {
        Self {
            routes: RouteConfig::with_base_uri("https://example.com"),
            verifier: VerifierConfig {
                max_attempts: DEFAULT_MAX_CRAWL_ATTEMPTS,
            },
            convergence: ConvergenceConfig { min_nodes: 1 },
        }
    }

    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let routes = env::var("LA_BASE_URI")
            .map(RouteConfig::with_base_uri)
            .unwrap_or(defaults.routes);

        let max_attempts = env::var("LA_MAX_CRAWL_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.verifier.max_attempts);

        let min_nodes = env::var("LA_MIN_CONVERGENCE_NODES")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|n| *n >= MIN_CONVERGENCE_NODES)
            .unwrap_or(defaults.convergence.min_nodes);

        Self {
            routes,
            verifier: VerifierConfig { max_attempts },
            convergence: ConvergenceConfig { min_nodes },
        }
    }
}
