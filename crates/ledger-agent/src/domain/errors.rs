//! # Domain Errors
//!
//! Error taxonomy for block access, chain verification and agent
//! construction.
//!
//! Integrity failures (`LinkageInconsistent`, `ChainBroken`,
//! `HeightMismatch`, `IncompleteTraversal`) are surfaced to the caller and
//! never repaired. The subsystem never retries on its own.

use thiserror::Error;

/// Hash type alias (32-byte SHA-256)
pub type Hash = [u8; 32];

/// Ledger agent error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Requested block is absent.
    #[error("Block not found: {0}")]
    NotFound(String),

    /// Block query option set is malformed.
    #[error("Invalid block query: {0}")]
    InvalidQuery(String),

    /// Parent id and parent hash disagree on whether a parent exists.
    #[error("Linkage inconsistent at block {block_id}: {detail}")]
    LinkageInconsistent {
        /// Block carrying the inconsistent linkage
        block_id: String,
        /// What is inconsistent
        detail: String,
    },

    /// A referenced parent id does not resolve.
    #[error("Chain broken: block {block_id} references missing parent {parent_id}")]
    ChainBroken {
        /// Child block
        block_id: String,
        /// Parent id that did not resolve
        parent_id: String,
    },

    /// Parent height is not exactly one less than the child height.
    #[error("Height mismatch at block {block_id}: expected parent height {expected}, got {actual}")]
    HeightMismatch {
        /// Child block
        block_id: String,
        /// Expected parent height
        expected: u64,
        /// Height the parent actually carries
        actual: u64,
    },

    /// Attempt bound exceeded before reaching genesis.
    #[error("Incomplete traversal: genesis not reached within {max_attempts} attempts")]
    IncompleteTraversal {
        /// Bound that was exceeded
        max_attempts: u32,
    },

    /// Plugin name not present in the registry.
    #[error("Plugin resolution failed: {0}")]
    PluginResolutionFailed(String),

    /// Plugin name registered twice.
    #[error("Plugin already registered: {0}")]
    PluginAlreadyRegistered(String),

    /// Two services claim the same service type.
    #[error("Service type conflict: '{service_type}' declared by plugin {plugin} is already registered")]
    ServiceTypeConflict {
        /// Colliding service type
        service_type: String,
        /// Plugin whose declaration collided
        plugin: String,
    },

    /// Not enough nodes to run a comparison.
    #[error("Not enough nodes: {got} < {required}")]
    InsufficientNodes {
        /// Number of nodes supplied
        got: usize,
        /// Minimum required
        required: usize,
    },

    /// Operation payload rejected by the node.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Underlying storage failed.
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl LedgerError {
    /// True for errors that indicate corrupted chain data.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            LedgerError::LinkageInconsistent { .. }
                | LedgerError::ChainBroken { .. }
                | LedgerError::HeightMismatch { .. }
        )
    }
}

/// Result type for ledger agent operations
pub type LedgerResult<T> = Result<T, LedgerError>;
