//! # Posting Core
//!
//! A business-event-driven ledger poster: when a sales order, sales
//! invoice, goods receipt, or payroll run is recorded, it atomically
//! derives and persists a balanced double-entry journal voucher against a
//! chart of accounts - resolving or creating the right ledger accounts,
//! splitting GST into jurisdictional buckets, and assigning sequential
//! document numbers - without ever committing an unbalanced or duplicated
//! posting.
//!
//! ## Features
//!
//! - **Voucher building**: per-event debit/credit assembly that always
//!   nets to zero (advance receipts, sales with GST and COGS, goods
//!   receipts, payroll)
//! - **Ledger resolution**: find-or-create of counterparty accounts with
//!   party back-fill, safe under concurrent triggers
//! - **Document numbering**: per-period atomic counters behind
//!   human-readable numbers like `SO-2506-0001`
//! - **GST splits**: CGST/SGST vs IGST allocation from GSTIN state prefixes
//! - **Atomic posting**: one conditional commit per event with bounded
//!   optimistic retry and structured idempotency keys
//! - **Storage abstraction**: store-agnostic design with a trait-based
//!   seam and an in-memory store for tests
//!
//! ## Quick Start
//!
//! ```rust
//! use posting_core::{MemoryStore, PostingConfig, TransactionalPoster};
//!
//! let store = MemoryStore::new();
//! let config = PostingConfig {
//!     company_gstin: "27AAAAA0000A1Z5".to_string(),
//!     ..Default::default()
//! };
//! let poster = TransactionalPoster::new(store, config);
//! // poster.post(&event).await drives one atomic posting cycle
//! # let _ = poster;
//! ```

pub mod config;
pub mod events;
pub mod posting;
pub mod tax;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use events::*;
pub use posting::*;
pub use tax::*;
pub use traits::*;
pub use types::*;
pub use utils::memory_store::MemoryStore;
