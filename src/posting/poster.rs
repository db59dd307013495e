//! Transactional poster: one atomic posting cycle per business event
//!
//! Each event runs through Received -> Resolving -> Building -> Committing
//! and ends Committed or Aborted. Every read of a cycle goes through the
//! store, every write lands in one batch, and the commit carries the store
//! version observed at the start; a concurrent commit in between conflicts
//! and the whole cycle re-executes, bounded by the configured retry budget.
//! The cycle body is free of non-transactional side effects, so re-running
//! it is safe.

use bigdecimal::BigDecimal;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::PostingConfig;
use crate::events::*;
use crate::posting::builders::{
    build_advance_receipt, build_grn_voucher, build_payroll_voucher, build_sales_vouchers,
    commission_for_items, CostedItem, PayrollLedgers, SalesLedgers,
};
use crate::posting::resolver::{CounterpartyRole, LedgerResolver};
use crate::posting::sequence::{DocumentKind, DocumentSequencer};
use crate::tax::split_gst;
use crate::traits::{PostingStore, WriteBatch, WriteOp};
use crate::types::*;

/// Phases of one posting cycle, recorded in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingPhase {
    Received,
    Resolving,
    Building,
    Committing,
    Committed,
    Aborted,
}

/// What a committed cycle produced
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostingReceipt {
    /// Vouchers written by this cycle, in build order
    pub voucher_ids: Vec<Uuid>,
    /// Document number allocated and written back, when the event takes one
    pub document_number: Option<String>,
    /// Commission derived for a delivered order
    pub commission: Option<BigDecimal>,
}

/// Transactional poster over a posting store.
///
/// The store handle is injected, so tests run the whole protocol against
/// an in-memory store.
pub struct TransactionalPoster<S: PostingStore + Clone> {
    store: S,
    config: PostingConfig,
    resolver: LedgerResolver<S>,
    sequencer: DocumentSequencer<S>,
}

impl<S: PostingStore + Clone> TransactionalPoster<S> {
    pub fn new(store: S, config: PostingConfig) -> Self {
        Self {
            resolver: LedgerResolver::new(store.clone()),
            sequencer: DocumentSequencer::new(store.clone()),
            store,
            config,
        }
    }

    /// Post one business event atomically.
    ///
    /// Re-executes the cycle on commit conflicts up to the configured
    /// bound, then aborts. Aborted cycles leave no partial state and the
    /// event stays reprocessable.
    pub async fn post(&self, event: &BusinessEvent) -> PostingResult<PostingReceipt> {
        let retries = self.config.max_commit_retries.max(1);
        for attempt in 1..=retries {
            match self.run_cycle(event).await {
                Err(PostingError::WriteConflict) => {
                    warn!(
                        source_id = event.source_id(),
                        attempt,
                        "commit conflict, re-running posting cycle"
                    );
                }
                Err(err) => {
                    error!(
                        source_id = event.source_id(),
                        phase = ?PostingPhase::Aborted,
                        %err,
                        "posting aborted"
                    );
                    return Err(err);
                }
                Ok(receipt) => {
                    info!(
                        source_id = event.source_id(),
                        phase = ?PostingPhase::Committed,
                        vouchers = receipt.voucher_ids.len(),
                        "posting committed"
                    );
                    return Ok(receipt);
                }
            }
        }

        error!(
            source_id = event.source_id(),
            phase = ?PostingPhase::Aborted,
            "posting aborted, commit retries exhausted"
        );
        Err(PostingError::RetriesExhausted(retries))
    }

    async fn run_cycle(&self, event: &BusinessEvent) -> PostingResult<PostingReceipt> {
        // Received: the snapshot is already in hand; pin the store version
        // every read and the final commit are checked against.
        let version = self.store.version().await?;
        let key = event.idempotency_key();

        match event {
            BusinessEvent::OrderCreated(order) => {
                self.post_order_created(version, key, order).await
            }
            BusinessEvent::OrderDelivered(delivery) => {
                self.post_order_delivered(version, key, delivery).await
            }
            BusinessEvent::QuotationCreated(quotation) => {
                self.post_quotation_created(version, quotation).await
            }
            BusinessEvent::InvoiceCreated(invoice) => {
                self.post_invoice_created(version, key, invoice).await
            }
            BusinessEvent::GrnRecorded(grn) => self.post_grn_recorded(version, key, grn).await,
            BusinessEvent::PayrollRun(run) => self.post_payroll_run(version, key, run).await,
        }
    }

    async fn post_order_created(
        &self,
        version: u64,
        key: IdempotencyKey,
        order: &OrderCreated,
    ) -> PostingResult<PostingReceipt> {
        if self.store.get_order_number(&order.order_id).await?.is_some() {
            return Err(PostingError::DuplicatePosting(key));
        }

        // Resolving
        let allocation = self
            .sequencer
            .allocate(DocumentKind::SalesOrder, order.date)
            .await?;

        let mut batch = WriteBatch::new();
        let mut receipt = PostingReceipt {
            document_number: Some(allocation.number.clone()),
            ..Default::default()
        };

        // Building
        if order.payment_received > BigDecimal::from(0) {
            let customer = self
                .resolver
                .resolve_or_create(
                    &order.counterparty,
                    &order.customer_name,
                    order.customer_email.as_deref(),
                    CounterpartyRole::Customer,
                )
                .await?;
            let bank_ledger = self.receipt_ledger().await?;

            let voucher = build_advance_receipt(order, &bank_ledger, &customer.ledger_id, key)?;
            receipt.voucher_ids.push(voucher.id);

            for op in customer.writes {
                batch.push(op);
            }
            batch.push(WriteOp::PutVoucher(voucher));
        }

        // Committing
        batch.push(allocation.counter_write);
        batch.push(WriteOp::SetOrderNumber {
            order_id: order.order_id.clone(),
            number: allocation.number,
        });
        self.store.commit(version, batch).await?;
        Ok(receipt)
    }

    /// Bank ledger for incoming digital payments: matched by the company's
    /// primary UPI id, falling back to the configured cash ledger.
    async fn receipt_ledger(&self) -> PostingResult<String> {
        if let Some(upi_id) = &self.config.primary_upi_id {
            if let Some(account) = self.store.find_ledger_by_upi(upi_id).await? {
                return Ok(account.id);
            }
        }

        let cash_id = &self.config.default_cash_ledger_id;
        self.store
            .get_ledger(cash_id)
            .await?
            .map(|account| account.id)
            .ok_or_else(|| PostingError::MissingLedger(cash_id.clone()))
    }

    async fn post_order_delivered(
        &self,
        version: u64,
        key: IdempotencyKey,
        delivery: &OrderDelivered,
    ) -> PostingResult<PostingReceipt> {
        if self
            .store
            .get_order_commission(&delivery.order_id)
            .await?
            .is_some()
        {
            return Err(PostingError::DuplicatePosting(key));
        }

        // No voucher on this path: commission accrual is a wallet balance
        // increment plus a back-fill on the order.
        let commission = commission_for_items(&delivery.items, &delivery.commission_rates);

        let mut batch = WriteBatch::new();
        if commission > BigDecimal::from(0) {
            batch.push(WriteOp::IncrementWallet {
                assignee_id: delivery.assignee_id.clone(),
                amount: commission.clone(),
            });
            batch.push(WriteOp::SetOrderCommission {
                order_id: delivery.order_id.clone(),
                commission: commission.clone(),
            });
            self.store.commit(version, batch).await?;
        }

        Ok(PostingReceipt {
            commission: Some(commission),
            ..Default::default()
        })
    }

    async fn post_quotation_created(
        &self,
        version: u64,
        quotation: &QuotationCreated,
    ) -> PostingResult<PostingReceipt> {
        // Numbering runs on first creation only.
        if let Some(existing) = &quotation.existing_number {
            info!(
                quotation_id = %quotation.quotation_id,
                number = %existing,
                "quotation already numbered, skipping"
            );
            return Ok(PostingReceipt {
                document_number: Some(existing.clone()),
                ..Default::default()
            });
        }
        if let Some(existing) = self
            .store
            .get_quotation_number(&quotation.quotation_id)
            .await?
        {
            return Ok(PostingReceipt {
                document_number: Some(existing),
                ..Default::default()
            });
        }

        let allocation = self
            .sequencer
            .allocate(DocumentKind::Quotation, quotation.date)
            .await?;

        let mut batch = WriteBatch::new();
        batch.push(allocation.counter_write);
        batch.push(WriteOp::SetQuotationNumber {
            quotation_id: quotation.quotation_id.clone(),
            number: allocation.number.clone(),
        });
        self.store.commit(version, batch).await?;

        Ok(PostingReceipt {
            document_number: Some(allocation.number),
            ..Default::default()
        })
    }

    async fn post_invoice_created(
        &self,
        version: u64,
        key: IdempotencyKey,
        invoice: &InvoiceCreated,
    ) -> PostingResult<PostingReceipt> {
        if self.store.find_voucher_by_key(&key).await?.is_some() {
            return Err(PostingError::DuplicatePosting(key));
        }

        // Resolving
        let customer = self
            .resolver
            .resolve_or_create(
                &invoice.counterparty,
                &invoice.customer_name,
                invoice.customer_email.as_deref(),
                CounterpartyRole::Customer,
            )
            .await?;

        let names = &self.config.ledger_names;
        let mut items = Vec::with_capacity(invoice.items.len());
        for item in &invoice.items {
            items.push(CostedItem {
                product_id: item.product_id.clone(),
                quantity: item.quantity.clone(),
                product: self.store.get_product(&item.product_id).await?,
            });
        }

        let ledgers = SalesLedgers {
            customer: customer.ledger_id.clone(),
            sales: self.named_ledger(&names.sales).await?,
            cgst_output: self.named_ledger(&names.cgst_output).await?,
            sgst_output: self.named_ledger(&names.sgst_output).await?,
            igst_output: self.named_ledger(&names.igst_output).await?,
            customer_advances: self.named_ledger(&names.customer_advances).await?,
            cost_of_goods_sold: self.named_ledger(&names.cost_of_goods_sold).await?,
            finished_goods: self.named_ledger(&names.finished_goods).await?,
        };

        // Building
        let split = split_gst(
            &self.config.company_gstin,
            invoice.party_gstin.as_deref(),
            &invoice.total_tax,
        );
        let vouchers = build_sales_vouchers(invoice, &split, &ledgers, &items, key)?;

        // Committing
        let mut batch = WriteBatch::new();
        for op in customer.writes {
            batch.push(op);
        }
        let mut receipt = PostingReceipt::default();
        for voucher in vouchers {
            receipt.voucher_ids.push(voucher.id);
            batch.push(WriteOp::PutVoucher(voucher));
        }
        self.store.commit(version, batch).await?;
        Ok(receipt)
    }

    async fn post_grn_recorded(
        &self,
        version: u64,
        key: IdempotencyKey,
        grn: &GrnRecorded,
    ) -> PostingResult<PostingReceipt> {
        if self.store.find_voucher_by_key(&key).await?.is_some() {
            return Err(PostingError::DuplicatePosting(key));
        }

        let supplier = self
            .resolver
            .resolve_or_create(
                &grn.counterparty,
                &grn.supplier_name,
                grn.supplier_email.as_deref(),
                CounterpartyRole::Supplier,
            )
            .await?;

        let inventory = self
            .named_ledger(&self.config.ledger_names.finished_goods)
            .await?
            .ok_or_else(|| {
                PostingError::MissingLedger(self.config.ledger_names.finished_goods.clone())
            })?;

        let voucher = build_grn_voucher(grn, &inventory, &supplier.ledger_id, key)?;

        let mut batch = WriteBatch::new();
        for op in supplier.writes {
            batch.push(op);
        }
        let receipt = PostingReceipt {
            voucher_ids: vec![voucher.id],
            ..Default::default()
        };
        batch.push(WriteOp::PutVoucher(voucher));
        self.store.commit(version, batch).await?;
        Ok(receipt)
    }

    async fn post_payroll_run(
        &self,
        version: u64,
        key: IdempotencyKey,
        run: &PayrollRun,
    ) -> PostingResult<PostingReceipt> {
        crate::utils::validation::validate_period_key(&run.period)?;

        if self.store.find_voucher_by_key(&key).await?.is_some() {
            return Err(PostingError::DuplicatePosting(key));
        }

        let names = &self.config.ledger_names;
        let ledgers = PayrollLedgers {
            salaries: self.required_ledger(&names.salaries).await?,
            salary_payable: self.required_ledger(&names.salary_payable).await?,
            pf_payable: self.required_ledger(&names.pf_payable).await?,
            professional_tax_payable: self
                .required_ledger(&names.professional_tax_payable)
                .await?,
            tds_payable: self.required_ledger(&names.tds_payable).await?,
        };

        let voucher = build_payroll_voucher(run, &ledgers, key)?;

        let mut batch = WriteBatch::new();
        let receipt = PostingReceipt {
            voucher_ids: vec![voucher.id],
            ..Default::default()
        };
        batch.push(WriteOp::PutVoucher(voucher));
        self.store.commit(version, batch).await?;
        Ok(receipt)
    }

    /// Unique active ledger with the given name, if one exists. Duplicate
    /// active names fail closed.
    async fn named_ledger(&self, name: &str) -> PostingResult<Option<String>> {
        let candidates = self.store.find_ledgers_by_name(name).await?;
        let mut active = candidates.into_iter().filter(|l| l.is_active());

        match (active.next(), active.next()) {
            (Some(account), None) => Ok(Some(account.id)),
            (None, _) => Ok(None),
            (Some(_), Some(_)) => Err(PostingError::ResolutionAmbiguity(
                name.to_string(),
                "multiple active ledgers share this name".to_string(),
            )),
        }
    }

    async fn required_ledger(&self, name: &str) -> PostingResult<String> {
        self.named_ledger(name)
            .await?
            .ok_or_else(|| PostingError::MissingLedger(name.to_string()))
    }
}
