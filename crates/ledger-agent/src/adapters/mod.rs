//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-process implementations of the outbound ports: a memory-backed ledger
//! node with gossip, and a static plugin registry.

mod memory;
mod plugin_registry;

pub use memory::{GossipNetwork, InMemoryLedgerNode};
pub use plugin_registry::StaticPluginRegistry;
