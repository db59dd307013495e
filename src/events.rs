//! Business event snapshots consumed from the event trigger layer.
//!
//! Each event variant carries an immutable snapshot of the triggering
//! document, taken at trigger time. Shape sniffing ("is there a `user_id`
//! on this record?") is resolved once at the boundary into a uniform
//! counterparty reference per variant.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::IdempotencyKey;

/// Reference to the counterparty behind an event. Either a party record
/// exists in master data, or the event only carries inline contact details
/// and the resolver works from the display name alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CounterpartyRef {
    /// Known party record id
    Party(String),
    /// No party record; resolve by display name and back-fill nothing
    Inline { name: String, email: Option<String> },
}

/// Line item on an order, quoted by category for commission lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub category: String,
    pub price: BigDecimal,
    pub quantity: BigDecimal,
}

/// Line item on a sales invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub product_id: String,
    pub quantity: BigDecimal,
}

/// Snapshot of a sales order at creation time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCreated {
    pub order_id: String,
    pub date: NaiveDate,
    pub counterparty: CounterpartyRef,
    pub customer_name: String,
    pub customer_email: Option<String>,
    /// Advance received with the order, zero when none
    pub payment_received: BigDecimal,
}

/// Snapshot of an order transitioning to Delivered with an assignee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDelivered {
    pub order_id: String,
    pub assignee_id: String,
    pub items: Vec<OrderItem>,
    /// Assignee's commission rate (percent) per item category
    pub commission_rates: HashMap<String, BigDecimal>,
}

/// Snapshot of a quotation at first creation (no number assigned yet)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotationCreated {
    pub quotation_id: String,
    pub date: NaiveDate,
    /// Number already on the document, if any; numbering is skipped when set
    pub existing_number: Option<String>,
}

/// Snapshot of a sales invoice at creation time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceCreated {
    pub invoice_id: String,
    pub date: NaiveDate,
    pub counterparty: CounterpartyRef,
    pub customer_name: String,
    pub customer_email: Option<String>,
    /// Counterparty GSTIN; absent defaults to intrastate treatment
    pub party_gstin: Option<String>,
    pub grand_total: BigDecimal,
    pub taxable_amount: BigDecimal,
    pub total_tax: BigDecimal,
    /// Advance already received against this invoice
    pub amount_paid: BigDecimal,
    pub items: Vec<InvoiceItem>,
}

/// Snapshot of a goods receipt note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrnRecorded {
    pub grn_id: String,
    pub date: NaiveDate,
    pub counterparty: CounterpartyRef,
    pub supplier_name: String,
    pub supplier_email: Option<String>,
    pub total_value: BigDecimal,
}

/// One employee's computed pay for the period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeePay {
    pub employee_id: String,
    pub gross: BigDecimal,
    pub net: BigDecimal,
    pub pf: BigDecimal,
    pub professional_tax: BigDecimal,
    pub tds: BigDecimal,
}

/// Manually triggered payroll posting for one pay period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// Canonical period key, e.g. "2025-06"
    pub period: String,
    pub date: NaiveDate,
    pub employees: Vec<EmployeePay>,
}

/// Tagged union over every event class the poster handles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BusinessEvent {
    OrderCreated(OrderCreated),
    OrderDelivered(OrderDelivered),
    QuotationCreated(QuotationCreated),
    InvoiceCreated(InvoiceCreated),
    GrnRecorded(GrnRecorded),
    PayrollRun(PayrollRun),
}

impl BusinessEvent {
    /// Structured idempotency key for this event, used to detect re-fires
    /// of the same trigger before any voucher is built.
    pub fn idempotency_key(&self) -> IdempotencyKey {
        match self {
            BusinessEvent::OrderCreated(e) => IdempotencyKey::new("order", e.order_id.clone()),
            BusinessEvent::OrderDelivered(e) => {
                IdempotencyKey::new("order-delivery", e.order_id.clone())
            }
            BusinessEvent::QuotationCreated(e) => {
                IdempotencyKey::new("quotation", e.quotation_id.clone())
            }
            BusinessEvent::InvoiceCreated(e) => {
                IdempotencyKey::new("invoice", e.invoice_id.clone())
            }
            BusinessEvent::GrnRecorded(e) => IdempotencyKey::new("grn", e.grn_id.clone()),
            BusinessEvent::PayrollRun(e) => IdempotencyKey::new("payroll", e.period.clone()),
        }
    }

    /// Source document id, used in narrations and logs
    pub fn source_id(&self) -> &str {
        match self {
            BusinessEvent::OrderCreated(e) => &e.order_id,
            BusinessEvent::OrderDelivered(e) => &e.order_id,
            BusinessEvent::QuotationCreated(e) => &e.quotation_id,
            BusinessEvent::InvoiceCreated(e) => &e.invoice_id,
            BusinessEvent::GrnRecorded(e) => &e.grn_id,
            BusinessEvent::PayrollRun(e) => &e.period,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idempotency_keys_per_event_class() {
        let payroll = BusinessEvent::PayrollRun(PayrollRun {
            period: "2025-06".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            employees: vec![],
        });
        assert_eq!(payroll.idempotency_key().to_string(), "payroll:2025-06");

        let quotation = BusinessEvent::QuotationCreated(QuotationCreated {
            quotation_id: "q-17".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            existing_number: None,
        });
        assert_eq!(quotation.idempotency_key().to_string(), "quotation:q-17");
        assert_eq!(quotation.source_id(), "q-17");
    }
}
