//! Core types and data structures for the posting system

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account natures following standard accounting principles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountNature {
    /// Assets - what the business owns (Cash, Receivables, Inventory, etc.)
    Asset,
    /// Liabilities - what the business owes (GST Payable, Salary Payable, etc.)
    Liability,
    /// Equity - owner's interest in the business
    Equity,
    /// Income/Revenue - money earned by the business
    Income,
    /// Expenses - costs incurred by the business
    Expense,
}

impl AccountNature {
    /// Returns the normal balance side for this nature.
    /// Assets and Expenses normally carry debit balances;
    /// Liabilities, Equity, and Income normally carry credit balances.
    pub fn normal_balance(&self) -> EntryType {
        match self {
            AccountNature::Asset | AccountNature::Expense => EntryType::Debit,
            AccountNature::Liability | AccountNature::Equity | AccountNature::Income => {
                EntryType::Credit
            }
        }
    }
}

/// Sides of an entry in double-entry bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    Debit,
    Credit,
}

/// Whether a ledger account is available for posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerStatus {
    Active,
    Inactive,
}

/// Bank details carried by bank/UPI ledger accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BankDetails {
    /// UPI id used to match incoming digital payments to this account
    pub upi_id: Option<String>,
    pub account_number: Option<String>,
    pub ifsc: Option<String>,
}

/// Opening balance of a ledger account at the time it was created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningBalance {
    pub amount: BigDecimal,
    pub side: EntryType,
    pub as_of: NaiveDateTime,
}

impl OpeningBalance {
    /// Zero opening balance on the account's normal side
    pub fn zero(side: EntryType, as_of: NaiveDateTime) -> Self {
        Self {
            amount: BigDecimal::from(0),
            side,
            as_of,
        }
    }
}

/// Chart-of-accounts ledger account.
///
/// Created once and read-mostly thereafter. Balances are never stored as a
/// running total; they are derived by replaying journal entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerAccount {
    /// Unique identifier for the account
    pub id: String,
    /// Human-readable account name, unique within the active set
    pub name: String,
    /// Grouping within the chart of accounts
    pub group_id: Option<String>,
    /// Nature of the account (Asset, Liability, etc.)
    pub nature: AccountNature,
    /// Free-form sub-classification (RECEIVABLE, PAYABLE, BANK, CASH, ...)
    pub kind: String,
    /// Opening balance recorded at creation
    pub opening_balance: OpeningBalance,
    /// Bank details, present on bank/UPI accounts
    pub bank: Option<BankDetails>,
    pub status: LedgerStatus,
    pub created_at: NaiveDateTime,
}

impl LedgerAccount {
    /// Create a new active account with a zero opening balance on its
    /// normal side.
    pub fn new(id: String, name: String, nature: AccountNature, kind: String) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id,
            name,
            group_id: None,
            nature,
            kind,
            opening_balance: OpeningBalance::zero(nature.normal_balance(), now),
            bank: None,
            status: LedgerStatus::Active,
            created_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == LedgerStatus::Active
    }
}

/// Counterparty record (customer or supplier), owned by the master-data
/// subsystem. The posting core only reads it and back-fills
/// `coa_ledger_id` once resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    /// CUSTOMER or SUPPLIER
    pub kind: String,
    /// Weak reference to the party's ledger account, null until resolved
    pub coa_ledger_id: Option<String>,
}

/// Product master record, read when deriving cost-of-goods-sold entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Unit cost used for COGS derivation; absent when cost is unknown
    pub cost: Option<BigDecimal>,
    /// Inventory ledger for this product; products without one fall back
    /// to the default finished-goods ledger
    pub coa_account_id: Option<String>,
}

/// Individual debit or credit line within a journal voucher.
///
/// Carrying a side plus a single amount makes "exactly one of debit/credit
/// non-zero" structural rather than a convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoucherEntry {
    /// Ledger account being affected
    pub account_id: String,
    pub entry_type: EntryType,
    pub amount: BigDecimal,
    pub description: Option<String>,
}

impl VoucherEntry {
    pub fn debit(account_id: String, amount: BigDecimal) -> Self {
        Self {
            account_id,
            entry_type: EntryType::Debit,
            amount,
            description: None,
        }
    }

    pub fn credit(account_id: String, amount: BigDecimal) -> Self {
        Self {
            account_id,
            entry_type: EntryType::Credit,
            amount,
            description: None,
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }
}

/// Category of journal voucher, derived from the triggering event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoucherType {
    AdvanceReceipt,
    Sales,
    AdvanceAdjustment,
    CostOfGoodsSold,
    GoodsReceipt,
    Payroll,
}

/// Structured idempotency key stored alongside each voucher and queried by
/// exact equality, never by narration substring matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdempotencyKey {
    /// Triggering event class ("order", "invoice", "grn", "payroll")
    pub event_kind: String,
    /// Source document id, or the period key for period-scoped events
    pub source_id: String,
}

impl IdempotencyKey {
    pub fn new(event_kind: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            event_kind: event_kind.into(),
            source_id: source_id.into(),
        }
    }
}

impl std::fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.event_kind, self.source_id)
    }
}

/// An atomic double-entry posting: a set of debit/credit lines that must
/// net to zero. Immutable once committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalVoucher {
    pub id: Uuid,
    pub date: NaiveDate,
    /// Free-text description of the posting
    pub narration: String,
    pub voucher_type: VoucherType,
    /// Present on vouchers whose trigger can plausibly re-fire
    pub idempotency_key: Option<IdempotencyKey>,
    pub entries: Vec<VoucherEntry>,
    pub created_at: NaiveDateTime,
}

impl JournalVoucher {
    pub fn new(date: NaiveDate, narration: String, voucher_type: VoucherType) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            narration,
            voucher_type,
            idempotency_key: None,
            entries: Vec::new(),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    pub fn with_idempotency_key(mut self, key: IdempotencyKey) -> Self {
        self.idempotency_key = Some(key);
        self
    }

    pub fn add_entry(&mut self, entry: VoucherEntry) {
        self.entries.push(entry);
    }

    pub fn total_debits(&self) -> BigDecimal {
        self.entries
            .iter()
            .filter(|e| e.entry_type == EntryType::Debit)
            .map(|e| &e.amount)
            .sum()
    }

    pub fn total_credits(&self) -> BigDecimal {
        self.entries
            .iter()
            .filter(|e| e.entry_type == EntryType::Credit)
            .map(|e| &e.amount)
            .sum()
    }

    pub fn is_balanced(&self) -> bool {
        self.total_debits() == self.total_credits()
    }

    /// Validate the voucher before committing
    pub fn validate(&self) -> PostingResult<()> {
        if self.entries.len() < 2 {
            return Err(PostingError::Validation(
                "Voucher must have at least two entries for double-entry bookkeeping".to_string(),
            ));
        }

        if !self.is_balanced() {
            return Err(PostingError::Validation(format!(
                "Voucher is not balanced: debits = {}, credits = {}",
                self.total_debits(),
                self.total_credits()
            )));
        }

        for entry in &self.entries {
            if entry.amount <= BigDecimal::from(0) {
                return Err(PostingError::Validation(
                    "Entry amounts must be positive".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Errors that can occur while posting a business event
#[derive(Debug, thiserror::Error)]
pub enum PostingError {
    /// A required named ledger does not exist; the posting attempt aborts
    /// and the triggering document is left unposted for remediation.
    #[error("Required ledger not found: {0}")]
    MissingLedger(String),
    /// Creating a ledger would collide with an existing inactive or
    /// duplicate entry of the same name; fail closed rather than pick one.
    #[error("Ledger resolution is ambiguous for '{0}': {1}")]
    ResolutionAmbiguity(String, String),
    /// A concurrent commit moved the store version; the cycle re-executes.
    #[error("Concurrent commit conflict, store version moved")]
    WriteConflict,
    /// Optimistic commit lost too many races and the retry budget ran out.
    #[error("Transaction conflict: retries exhausted after {0} attempts")]
    RetriesExhausted(u32),
    /// A voucher with the same idempotency key already exists.
    #[error("Posting already recorded for key '{0}'")]
    DuplicatePosting(IdempotencyKey),
    #[error("Party not found: {0}")]
    PartyNotFound(String),
    #[error("Invalid posting: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for posting operations
pub type PostingResult<T> = Result<T, PostingError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_normal_balance_sides() {
        assert_eq!(AccountNature::Asset.normal_balance(), EntryType::Debit);
        assert_eq!(AccountNature::Expense.normal_balance(), EntryType::Debit);
        assert_eq!(AccountNature::Liability.normal_balance(), EntryType::Credit);
        assert_eq!(AccountNature::Income.normal_balance(), EntryType::Credit);
    }

    #[test]
    fn test_voucher_balance_check() {
        let mut voucher = JournalVoucher::new(date(), "Sale".to_string(), VoucherType::Sales);
        voucher.add_entry(VoucherEntry::debit(
            "customer".to_string(),
            BigDecimal::from(1180),
        ));
        voucher.add_entry(VoucherEntry::credit(
            "sales".to_string(),
            BigDecimal::from(1000),
        ));
        voucher.add_entry(VoucherEntry::credit(
            "gst".to_string(),
            BigDecimal::from(180),
        ));

        assert!(voucher.is_balanced());
        assert!(voucher.validate().is_ok());
        assert_eq!(voucher.total_debits(), BigDecimal::from(1180));
    }

    #[test]
    fn test_unbalanced_voucher_rejected() {
        let mut voucher = JournalVoucher::new(date(), "Bad".to_string(), VoucherType::Sales);
        voucher.add_entry(VoucherEntry::debit("a".to_string(), BigDecimal::from(100)));
        voucher.add_entry(VoucherEntry::credit("b".to_string(), BigDecimal::from(50)));

        assert!(voucher.validate().is_err());
    }

    #[test]
    fn test_single_entry_voucher_rejected() {
        let mut voucher = JournalVoucher::new(date(), "Bad".to_string(), VoucherType::Sales);
        voucher.add_entry(VoucherEntry::debit("a".to_string(), BigDecimal::from(100)));

        assert!(voucher.validate().is_err());
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let mut voucher = JournalVoucher::new(date(), "Bad".to_string(), VoucherType::Sales);
        voucher.add_entry(VoucherEntry::debit("a".to_string(), BigDecimal::from(0)));
        voucher.add_entry(VoucherEntry::credit("b".to_string(), BigDecimal::from(0)));

        assert!(voucher.validate().is_err());
    }

    #[test]
    fn test_idempotency_key_display() {
        let key = IdempotencyKey::new("payroll", "2025-06");
        assert_eq!(key.to_string(), "payroll:2025-06");
    }
}
