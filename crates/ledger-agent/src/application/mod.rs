//! # Application Module
//!
//! Application services orchestrating the domain and outbound ports.

pub mod agent;
pub mod blocks;
pub mod convergence;
pub mod verifier;

pub use agent::{
    LedgerAgent, LedgerAgentDocument, LedgerAgentOptions, BLOCK_SERVICE, CONFIG_SERVICE,
    CORE_SERVICES, EVENT_SERVICE, OPERATION_SERVICE, QUERY_SERVICE, STATUS_SERVICE,
};
pub use blocks::LedgerAgentBlocks;
pub use convergence::ConvergenceChecker;
pub use verifier::ChainVerifier;
