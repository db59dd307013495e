//! In-memory posting store for testing and development
//!
//! Implements the conditional atomic commit with a single store-wide
//! version: a commit batch applies only when the version still matches the
//! value the posting cycle observed, and every successful commit bumps it.
//! Coarse, but it gives tests the same conflict semantics a serializable
//! document store provides.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use crate::traits::*;
use crate::types::*;

#[derive(Debug, Default)]
struct Inner {
    version: u64,
    ledgers: HashMap<String, LedgerAccount>,
    parties: HashMap<String, Party>,
    products: HashMap<String, Product>,
    vouchers: Vec<JournalVoucher>,
    counters: HashMap<String, u64>,
    /// Every issued document number, scanned when seeding a period counter
    document_numbers: BTreeSet<String>,
    order_numbers: HashMap<String, String>,
    quotation_numbers: HashMap<String, String>,
    order_commissions: HashMap<String, BigDecimal>,
    wallets: HashMap<String, BigDecimal>,
}

/// In-memory store implementation
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Seed helpers for tests

    pub fn insert_ledger(&self, account: LedgerAccount) {
        let mut inner = self.inner.write().unwrap();
        inner.ledgers.insert(account.id.clone(), account);
    }

    pub fn insert_party(&self, party: Party) {
        let mut inner = self.inner.write().unwrap();
        inner.parties.insert(party.id.clone(), party);
    }

    pub fn insert_product(&self, product: Product) {
        let mut inner = self.inner.write().unwrap();
        inner.products.insert(product.id.clone(), product);
    }

    /// Record a number issued before the counter existed
    pub fn seed_document_number(&self, number: &str) {
        let mut inner = self.inner.write().unwrap();
        inner.document_numbers.insert(number.to_string());
    }

    // Inspection helpers for tests

    pub fn vouchers(&self) -> Vec<JournalVoucher> {
        self.inner.read().unwrap().vouchers.clone()
    }

    pub fn ledgers_named(&self, name: &str) -> Vec<LedgerAccount> {
        self.inner
            .read()
            .unwrap()
            .ledgers
            .values()
            .filter(|l| l.name == name)
            .cloned()
            .collect()
    }

    pub fn wallet_balance(&self, assignee_id: &str) -> BigDecimal {
        self.inner
            .read()
            .unwrap()
            .wallets
            .get(assignee_id)
            .cloned()
            .unwrap_or_else(|| BigDecimal::from(0))
    }

    fn apply(inner: &mut Inner, op: WriteOp) {
        match op {
            WriteOp::PutLedger(account) => {
                inner.ledgers.insert(account.id.clone(), account);
            }
            WriteOp::PutParty(party) => {
                inner.parties.insert(party.id.clone(), party);
            }
            WriteOp::PutVoucher(voucher) => {
                inner.vouchers.push(voucher);
            }
            WriteOp::SetCounter { prefix, value } => {
                inner.counters.insert(prefix, value);
            }
            WriteOp::SetOrderNumber { order_id, number } => {
                inner.document_numbers.insert(number.clone());
                inner.order_numbers.insert(order_id, number);
            }
            WriteOp::SetQuotationNumber {
                quotation_id,
                number,
            } => {
                inner.document_numbers.insert(number.clone());
                inner.quotation_numbers.insert(quotation_id, number);
            }
            WriteOp::SetOrderCommission {
                order_id,
                commission,
            } => {
                inner.order_commissions.insert(order_id, commission);
            }
            WriteOp::IncrementWallet {
                assignee_id,
                amount,
            } => {
                let balance = inner
                    .wallets
                    .entry(assignee_id)
                    .or_insert_with(|| BigDecimal::from(0));
                *balance += amount;
            }
        }
    }
}

#[async_trait]
impl PostingStore for MemoryStore {
    async fn version(&self) -> PostingResult<u64> {
        Ok(self.inner.read().unwrap().version)
    }

    async fn get_ledger(&self, ledger_id: &str) -> PostingResult<Option<LedgerAccount>> {
        Ok(self.inner.read().unwrap().ledgers.get(ledger_id).cloned())
    }

    async fn find_ledgers_by_name(&self, name: &str) -> PostingResult<Vec<LedgerAccount>> {
        Ok(self
            .inner
            .read()
            .unwrap()
            .ledgers
            .values()
            .filter(|l| l.name == name)
            .cloned()
            .collect())
    }

    async fn find_ledger_by_upi(&self, upi_id: &str) -> PostingResult<Option<LedgerAccount>> {
        Ok(self
            .inner
            .read()
            .unwrap()
            .ledgers
            .values()
            .find(|l| {
                l.is_active()
                    && l.bank
                        .as_ref()
                        .is_some_and(|bank| bank.upi_id.as_deref() == Some(upi_id))
            })
            .cloned())
    }

    async fn get_party(&self, party_id: &str) -> PostingResult<Option<Party>> {
        Ok(self.inner.read().unwrap().parties.get(party_id).cloned())
    }

    async fn get_product(&self, product_id: &str) -> PostingResult<Option<Product>> {
        Ok(self.inner.read().unwrap().products.get(product_id).cloned())
    }

    async fn get_counter(&self, prefix: &str) -> PostingResult<Option<u64>> {
        Ok(self.inner.read().unwrap().counters.get(prefix).copied())
    }

    async fn max_document_number(&self, prefix: &str) -> PostingResult<Option<String>> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .document_numbers
            .iter()
            .filter(|number| number.starts_with(prefix))
            .next_back()
            .cloned())
    }

    async fn find_voucher_by_key(
        &self,
        key: &IdempotencyKey,
    ) -> PostingResult<Option<JournalVoucher>> {
        Ok(self
            .inner
            .read()
            .unwrap()
            .vouchers
            .iter()
            .find(|v| v.idempotency_key.as_ref() == Some(key))
            .cloned())
    }

    async fn get_order_number(&self, order_id: &str) -> PostingResult<Option<String>> {
        Ok(self
            .inner
            .read()
            .unwrap()
            .order_numbers
            .get(order_id)
            .cloned())
    }

    async fn get_quotation_number(&self, quotation_id: &str) -> PostingResult<Option<String>> {
        Ok(self
            .inner
            .read()
            .unwrap()
            .quotation_numbers
            .get(quotation_id)
            .cloned())
    }

    async fn get_order_commission(&self, order_id: &str) -> PostingResult<Option<BigDecimal>> {
        Ok(self
            .inner
            .read()
            .unwrap()
            .order_commissions
            .get(order_id)
            .cloned())
    }

    async fn commit(&self, expected_version: u64, batch: WriteBatch) -> PostingResult<()> {
        let mut inner = self.inner.write().unwrap();
        if inner.version != expected_version {
            return Err(PostingError::WriteConflict);
        }

        for op in batch.ops {
            Self::apply(&mut inner, op);
        }
        inner.version += 1;
        Ok(())
    }
}
