//! Traits for storage abstraction and the atomic commit protocol

use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::types::*;

/// One write inside an atomic commit batch.
///
/// A posting cycle accumulates every side effect it wants - ledger
/// creation, party back-fill, counter bump, voucher documents, and
/// back-references onto the triggering documents - and hands them to the
/// store as a single all-or-nothing batch.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Create or replace a ledger account
    PutLedger(LedgerAccount),
    /// Merge the resolved ledger id (and refreshed contact fields) onto a party
    PutParty(Party),
    /// Persist a journal voucher
    PutVoucher(JournalVoucher),
    /// Set the sequence counter for a document-number prefix
    SetCounter { prefix: String, value: u64 },
    /// Write the allocated number back onto an order
    SetOrderNumber { order_id: String, number: String },
    /// Write the allocated number back onto a quotation
    SetQuotationNumber {
        quotation_id: String,
        number: String,
    },
    /// Stamp the derived commission amount onto a delivered order
    SetOrderCommission {
        order_id: String,
        commission: BigDecimal,
    },
    /// Increment an assignee's commission-payable wallet balance
    IncrementWallet {
        assignee_id: String,
        amount: BigDecimal,
    },
}

/// An atomic batch of writes committed together
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    pub ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: WriteOp) {
        self.ops.push(op);
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Storage abstraction for the posting core.
///
/// The store offers snapshot reads plus a conditional atomic multi-write:
/// `commit` applies a whole batch only if the store version has not moved
/// since the caller observed it, signalling a conflict otherwise. The
/// poster re-executes its cycle on conflict, so every read a cycle makes
/// must go through this trait and the cycle body must stay free of
/// non-transactional side effects.
#[async_trait]
pub trait PostingStore: Send + Sync {
    /// Current store version, observed before a cycle's reads
    async fn version(&self) -> PostingResult<u64>;

    /// Get a ledger account by id
    async fn get_ledger(&self, ledger_id: &str) -> PostingResult<Option<LedgerAccount>>;

    /// All ledger accounts whose name exactly matches, any status
    async fn find_ledgers_by_name(&self, name: &str) -> PostingResult<Vec<LedgerAccount>>;

    /// Active ledger account whose bank details carry the given UPI id
    async fn find_ledger_by_upi(&self, upi_id: &str) -> PostingResult<Option<LedgerAccount>>;

    /// Get a party record by id
    async fn get_party(&self, party_id: &str) -> PostingResult<Option<Party>>;

    /// Get a product record by id
    async fn get_product(&self, product_id: &str) -> PostingResult<Option<Product>>;

    /// Current value of a document-number sequence counter
    async fn get_counter(&self, prefix: &str) -> PostingResult<Option<u64>>;

    /// Lexicographically greatest already-issued number with the prefix,
    /// used once to seed a period's counter from pre-counter documents
    async fn max_document_number(&self, prefix: &str) -> PostingResult<Option<String>>;

    /// Voucher previously committed under the given idempotency key
    async fn find_voucher_by_key(
        &self,
        key: &IdempotencyKey,
    ) -> PostingResult<Option<JournalVoucher>>;

    /// Number already written back onto an order, if any
    async fn get_order_number(&self, order_id: &str) -> PostingResult<Option<String>>;

    /// Number already written back onto a quotation, if any
    async fn get_quotation_number(&self, quotation_id: &str) -> PostingResult<Option<String>>;

    /// Commission already stamped onto a delivered order, if any
    async fn get_order_commission(&self, order_id: &str) -> PostingResult<Option<BigDecimal>>;

    /// Apply the batch atomically if the version still equals
    /// `expected_version`, failing with [`PostingError::WriteConflict`]
    /// otherwise.
    async fn commit(&self, expected_version: u64, batch: WriteBatch) -> PostingResult<()>;
}
