//! # Domain Entities
//!
//! Blocks, their node-local metadata, and the summaries a ledger node
//! returns about its chain head.

use super::errors::{Hash, LedgerError, LedgerResult};
use super::invariants::invariant_genesis_linkage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;

/// Opaque operation payload sealed into a block.
///
/// Hashed through `canonical_json`, so object key order never matters.
pub type Operation = Value;

/// Block identifier, unique within a ledger.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct BlockId(pub String);

impl BlockId {
    /// Create a block id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for BlockId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One sealed ledger block.
///
/// Fields are public so stores can hand back whatever they persisted,
/// corrupted or not; `check_linkage` tells the two apart.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Block id.
    pub id: BlockId,
    /// Height in the chain, genesis is 0.
    pub block_height: u64,
    /// Parent block id, absent for genesis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_block: Option<BlockId>,
    /// Content hash of the parent, absent for genesis. Hex on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "hex_hash::option")]
    pub previous_block_hash: Option<Hash>,
    /// Operations in sealing order.
    #[serde(default)]
    pub operations: Vec<Operation>,
}

impl Block {
    /// Create a genesis block.
    pub fn genesis(id: BlockId, operations: Vec<Operation>) -> Self {
        Self {
            id,
            block_height: 0,
            previous_block: None,
            previous_block_hash: None,
            operations,
        }
    }

    /// Create the child of `parent`, linked by id and content hash.
    pub fn child_of(parent: &Block, id: BlockId, operations: Vec<Operation>) -> Self {
        Self {
            id,
            block_height: parent.block_height + 1,
            previous_block: Some(parent.id.clone()),
            previous_block_hash: Some(parent.content_hash()),
            operations,
        }
    }

    /// True when the block carries no parent pointer.
    pub fn is_genesis(&self) -> bool {
        self.previous_block.is_none()
    }

    /// SHA-256 over a length-prefixed encoding of every consensus field.
    pub fn content_hash(&self) -> Hash {
        let mut hasher = Sha256::new();
        update_field(&mut hasher, self.id.as_str().as_bytes());
        hasher.update(self.block_height.to_be_bytes());
        match &self.previous_block {
            Some(parent) => {
                hasher.update([1u8]);
                update_field(&mut hasher, parent.as_str().as_bytes());
            }
            None => hasher.update([0u8]),
        }
        match &self.previous_block_hash {
            Some(parent_hash) => {
                hasher.update([1u8]);
                hasher.update(parent_hash);
            }
            None => hasher.update([0u8]),
        }
        hasher.update((self.operations.len() as u64).to_be_bytes());
        let mut rendered = String::new();
        for operation in &self.operations {
            rendered.clear();
            canonical_json(operation, &mut rendered);
            update_field(&mut hasher, rendered.as_bytes());
        }
        hasher.finalize().into()
    }

    /// Check the genesis invariant on this block alone.
    pub fn check_linkage(&self) -> LedgerResult<()> {
        invariant_genesis_linkage(self)
    }
}

fn update_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_be_bytes());
    hasher.update(bytes);
}

/// Compact JSON with object keys sorted at every depth.
///
/// Independent of whether `serde_json` preserves insertion order.
pub fn canonical_json(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                canonical_json(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                canonical_json(item, out);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Serde helpers rendering `Hash` values as lowercase hex strings.
pub mod hex_hash {
    use super::Hash;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    /// Serialize a hash as hex.
    pub fn serialize<S: Serializer>(hash: &Hash, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(hash))
    }

    /// Deserialize a 64-character hex string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Hash, D::Error> {
        let text = String::deserialize(deserializer)?;
        let mut hash = [0u8; 32];
        hex::decode_to_slice(&text, &mut hash).map_err(D::Error::custom)?;
        Ok(hash)
    }

    /// Same, for optional hashes.
    pub mod option {
        use super::Hash;
        use serde::{Deserialize, Deserializer, Serializer};

        /// Serialize an optional hash as hex or null.
        pub fn serialize<S: Serializer>(
            hash: &Option<Hash>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match hash {
                Some(hash) => super::serialize(hash, serializer),
                None => serializer.serialize_none(),
            }
        }

        /// Deserialize an optional hex hash.
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Hash>, D::Error> {
            #[derive(Deserialize)]
            struct Wrapped(#[serde(with = "super")] Hash);

            let wrapped: Option<Wrapped> = Option::deserialize(deserializer)?;
            Ok(wrapped.map(|Wrapped(hash)| hash))
        }
    }
}

/// Node-local metadata stored next to a block.
///
/// Never part of the block's content and ignored when nodes are compared.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BlockMeta {
    /// Content hash of the block. Hex on the wire.
    #[serde(with = "hex_hash")]
    pub block_hash: Hash,
    /// Unix timestamp when this node stored the block.
    pub created: u64,
    /// Whether consensus has been reached on the block.
    pub consensus: bool,
    /// Unix timestamp when consensus was reached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus_date: Option<u64>,
}

impl BlockMeta {
    /// Metadata for a block this node sealed at `now`.
    pub fn sealed(block: &Block, now: u64) -> Self {
        Self {
            block_hash: block.content_hash(),
            created: now,
            consensus: true,
            consensus_date: Some(now),
        }
    }

    /// Hex rendering of the block hash.
    pub fn block_hash_hex(&self) -> String {
        hex::encode(self.block_hash)
    }
}

/// A block as returned by a store: content plus metadata.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockRecord {
    /// Block content.
    pub block: Block,
    /// Node-local metadata.
    pub meta: BlockMeta,
}

impl BlockRecord {
    /// Create a record.
    pub fn new(block: Block, meta: BlockMeta) -> Self {
        Self { block, meta }
    }
}

/// Current head of a node's chain.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LatestSummary {
    /// Latest sealed event block.
    pub event_block: BlockRecord,
}

/// Response body of the block service when no block is queried.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockServiceSummary {
    /// The ledger's genesis block.
    pub genesis: BlockRecord,
    /// The ledger's latest block.
    pub latest: BlockRecord,
}

impl BlockServiceSummary {
    /// Assemble a summary, rejecting a genesis record that is not genesis.
    pub fn new(genesis: BlockRecord, latest: BlockRecord) -> LedgerResult<Self> {
        if !genesis.block.is_genesis() {
            return Err(LedgerError::LinkageInconsistent {
                block_id: genesis.block.id.to_string(),
                detail: "genesis record has a parent".to_string(),
            });
        }
        Ok(Self { genesis, latest })
    }
}
