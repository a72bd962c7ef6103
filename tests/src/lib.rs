//! # Ledger Agent Test Suite
//!
//! Integration scenarios exercising the ledger agent against several
//! in-memory ledger nodes.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── agent.rs       # Service map and plugin mounting
//!     ├── continuity.rs  # 4 nodes, gossip, convergence
//!     └── crawl.rs       # Crawl to genesis and corruption bounds
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ledger-tests
//!
//! # With logs
//! RUST_LOG=ledger_agent=debug cargo test -p ledger-tests -- --nocapture
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]
