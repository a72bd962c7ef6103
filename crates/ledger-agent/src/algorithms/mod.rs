//! # Algorithms Module
//!
//! Crawl to genesis, cross-node block comparison, and service URL
//! derivation.

pub mod chain_crawl;
pub mod convergence;
pub mod service_url;

pub use chain_crawl::{crawl_from_latest, crawl_to_genesis};
pub use convergence::{compare_blocks, diff_fields};
pub use service_url::{
    dash_case, derive_service_url, plugin_url, strip_agent_prefix, AGENT_ID_PLACEHOLDER,
};
