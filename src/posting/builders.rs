//! Voucher builders, one per business-event type
//!
//! Builders are pure over already-resolved ledger ids: they assemble
//! entry lists that net to zero and never touch the store. A required
//! ledger the caller could not resolve surfaces here as
//! [`PostingError::MissingLedger`], aborting the whole posting cycle.

use bigdecimal::BigDecimal;
use std::collections::HashMap;
use tracing::warn;

use crate::events::{GrnRecorded, InvoiceCreated, OrderCreated, OrderItem, PayrollRun};
use crate::tax::GstSplit;
use crate::types::*;

fn zero() -> BigDecimal {
    BigDecimal::from(0)
}

/// Resolved ledger ids for a sales-invoice posting. Optional slots are
/// only required when the invoice actually needs them; the builder decides.
#[derive(Debug, Clone, Default)]
pub struct SalesLedgers {
    pub customer: String,
    pub sales: Option<String>,
    pub cgst_output: Option<String>,
    pub sgst_output: Option<String>,
    pub igst_output: Option<String>,
    pub customer_advances: Option<String>,
    pub cost_of_goods_sold: Option<String>,
    pub finished_goods: Option<String>,
}

/// Resolved ledger ids for a payroll posting; all of them are required
#[derive(Debug, Clone)]
pub struct PayrollLedgers {
    pub salaries: String,
    pub salary_payable: String,
    pub pf_payable: String,
    pub professional_tax_payable: String,
    pub tds_payable: String,
}

/// An invoice line joined with its product master record, when one exists
#[derive(Debug, Clone)]
pub struct CostedItem {
    pub product_id: String,
    pub quantity: BigDecimal,
    pub product: Option<Product>,
}

/// Advance receipt on order creation: money arrived with the order, so the
/// bank (or cash fallback) account is debited and the customer credited.
pub fn build_advance_receipt(
    order: &OrderCreated,
    bank_ledger_id: &str,
    customer_ledger_id: &str,
    key: IdempotencyKey,
) -> PostingResult<JournalVoucher> {
    let mut voucher = JournalVoucher::new(
        order.date,
        format!("Advance received with order {}", order.order_id),
        VoucherType::AdvanceReceipt,
    )
    .with_idempotency_key(key);

    voucher.add_entry(VoucherEntry::debit(
        bank_ledger_id.to_string(),
        order.payment_received.clone(),
    ));
    voucher.add_entry(VoucherEntry::credit(
        customer_ledger_id.to_string(),
        order.payment_received.clone(),
    ));

    voucher.validate()?;
    Ok(voucher)
}

/// Sales invoice posting: one to three vouchers.
///
/// The main voucher debits the customer and credits revenue plus the GST
/// buckets from the jurisdiction split. An advance-adjustment voucher is
/// added when part of the invoice was prepaid, and a COGS voucher when any
/// line item carries a known product cost.
pub fn build_sales_vouchers(
    invoice: &InvoiceCreated,
    split: &GstSplit,
    ledgers: &SalesLedgers,
    items: &[CostedItem],
    key: IdempotencyKey,
) -> PostingResult<Vec<JournalVoucher>> {
    let mut vouchers = vec![build_main_sales_voucher(invoice, split, ledgers, key.clone())?];

    if invoice.amount_paid > zero() {
        vouchers.push(build_advance_adjustment(invoice, ledgers, key.clone())?);
    }

    if let Some(cogs) = build_cogs_voucher(invoice, ledgers, items, key)? {
        vouchers.push(cogs);
    }

    Ok(vouchers)
}

fn build_main_sales_voucher(
    invoice: &InvoiceCreated,
    split: &GstSplit,
    ledgers: &SalesLedgers,
    key: IdempotencyKey,
) -> PostingResult<JournalVoucher> {
    let sales_ledger = ledgers
        .sales
        .as_ref()
        .ok_or_else(|| PostingError::MissingLedger("Sales".to_string()))?;

    let mut voucher = JournalVoucher::new(
        invoice.date,
        format!("Sales invoice {}", invoice.invoice_id),
        VoucherType::Sales,
    )
    .with_idempotency_key(key);

    // Tolerated partial GST setup: a missing output ledger drops only its
    // own bucket, logged loudly, and the customer debit shrinks by the
    // dropped amount so the voucher still balances.
    let mut tax_entries = Vec::new();
    let mut skipped = zero();
    let buckets = [
        ("CGST", &split.cgst, &ledgers.cgst_output),
        ("SGST", &split.sgst, &ledgers.sgst_output),
        ("IGST", &split.igst, &ledgers.igst_output),
    ];
    for (bucket, amount, ledger) in buckets {
        if *amount <= zero() {
            continue;
        }
        match ledger {
            Some(id) => tax_entries.push(
                VoucherEntry::credit(id.clone(), amount.clone())
                    .with_description(format!("{} on invoice", bucket)),
            ),
            None => {
                warn!(
                    invoice_id = %invoice.invoice_id,
                    bucket,
                    amount = %amount,
                    "GST output ledger missing, dropping tax entry"
                );
                skipped += amount;
            }
        }
    }

    voucher.add_entry(VoucherEntry::debit(
        ledgers.customer.clone(),
        &invoice.grand_total - &skipped,
    ));
    voucher.add_entry(
        VoucherEntry::credit(sales_ledger.clone(), invoice.taxable_amount.clone())
            .with_description("Taxable value".to_string()),
    );
    for entry in tax_entries {
        voucher.add_entry(entry);
    }

    voucher.validate()?;
    Ok(voucher)
}

fn build_advance_adjustment(
    invoice: &InvoiceCreated,
    ledgers: &SalesLedgers,
    key: IdempotencyKey,
) -> PostingResult<JournalVoucher> {
    let advances_ledger = ledgers
        .customer_advances
        .as_ref()
        .ok_or_else(|| PostingError::MissingLedger("Customer Advances".to_string()))?;

    let mut voucher = JournalVoucher::new(
        invoice.date,
        format!("Advance adjusted against invoice {}", invoice.invoice_id),
        VoucherType::AdvanceAdjustment,
    )
    .with_idempotency_key(key);

    voucher.add_entry(VoucherEntry::debit(
        advances_ledger.clone(),
        invoice.amount_paid.clone(),
    ));
    voucher.add_entry(VoucherEntry::credit(
        ledgers.customer.clone(),
        invoice.amount_paid.clone(),
    ));

    voucher.validate()?;
    Ok(voucher)
}

/// COGS recognition: total cost debited to the COGS ledger, one credit per
/// distinct product against its inventory ledger (or the finished-goods
/// default). Items without a known cost are skipped.
fn build_cogs_voucher(
    invoice: &InvoiceCreated,
    ledgers: &SalesLedgers,
    items: &[CostedItem],
    key: IdempotencyKey,
) -> PostingResult<Option<JournalVoucher>> {
    // product id -> (inventory ledger, accumulated cost)
    let mut per_product: Vec<(String, String, BigDecimal)> = Vec::new();

    for item in items {
        let Some(product) = &item.product else {
            continue;
        };
        let Some(cost) = &product.cost else {
            continue;
        };
        let line_cost = cost * &item.quantity;
        if line_cost <= zero() {
            continue;
        }

        let inventory_ledger = match &product.coa_account_id {
            Some(id) => id.clone(),
            None => ledgers
                .finished_goods
                .clone()
                .ok_or_else(|| PostingError::MissingLedger("Finished Goods".to_string()))?,
        };

        match per_product
            .iter_mut()
            .find(|(product_id, _, _)| product_id == &item.product_id)
        {
            Some((_, _, total)) => *total += line_cost,
            None => per_product.push((item.product_id.clone(), inventory_ledger, line_cost)),
        }
    }

    if per_product.is_empty() {
        return Ok(None);
    }

    let cogs_ledger = ledgers
        .cost_of_goods_sold
        .as_ref()
        .ok_or_else(|| PostingError::MissingLedger("Cost of Goods Sold".to_string()))?;

    let total_cost: BigDecimal = per_product.iter().map(|(_, _, cost)| cost).sum();

    let mut voucher = JournalVoucher::new(
        invoice.date,
        format!("COGS for invoice {}", invoice.invoice_id),
        VoucherType::CostOfGoodsSold,
    )
    .with_idempotency_key(key);

    voucher.add_entry(VoucherEntry::debit(cogs_ledger.clone(), total_cost));
    for (product_id, inventory_ledger, cost) in per_product {
        voucher.add_entry(
            VoucherEntry::credit(inventory_ledger, cost)
                .with_description(format!("Inventory issued for {}", product_id)),
        );
    }

    voucher.validate()?;
    Ok(Some(voucher))
}

/// Goods receipt: inventory debited, the supplier's payable credited
pub fn build_grn_voucher(
    grn: &GrnRecorded,
    inventory_ledger_id: &str,
    supplier_ledger_id: &str,
    key: IdempotencyKey,
) -> PostingResult<JournalVoucher> {
    let mut voucher = JournalVoucher::new(
        grn.date,
        format!("Goods receipt {}", grn.grn_id),
        VoucherType::GoodsReceipt,
    )
    .with_idempotency_key(key);

    voucher.add_entry(VoucherEntry::debit(
        inventory_ledger_id.to_string(),
        grn.total_value.clone(),
    ));
    voucher.add_entry(VoucherEntry::credit(
        supplier_ledger_id.to_string(),
        grn.total_value.clone(),
    ));

    voucher.validate()?;
    Ok(voucher)
}

/// Payroll posting for one period, summed across all salaried employees:
/// gross pay debited to salaries, net pay and each withholding credited to
/// its payable ledger. Zero-valued withholdings are omitted.
pub fn build_payroll_voucher(
    run: &PayrollRun,
    ledgers: &PayrollLedgers,
    key: IdempotencyKey,
) -> PostingResult<JournalVoucher> {
    let gross: BigDecimal = run.employees.iter().map(|e| &e.gross).sum();
    let net: BigDecimal = run.employees.iter().map(|e| &e.net).sum();
    let pf: BigDecimal = run.employees.iter().map(|e| &e.pf).sum();
    let pt: BigDecimal = run.employees.iter().map(|e| &e.professional_tax).sum();
    let tds: BigDecimal = run.employees.iter().map(|e| &e.tds).sum();

    if gross != &net + &pf + &pt + &tds {
        return Err(PostingError::Validation(format!(
            "Payroll for {} does not reconcile: gross {} != net {} + withholdings {}",
            run.period,
            gross,
            net,
            &pf + &pt + &tds
        )));
    }

    let mut voucher = JournalVoucher::new(
        run.date,
        format!("Payroll for period {}", run.period),
        VoucherType::Payroll,
    )
    .with_idempotency_key(key);

    voucher.add_entry(VoucherEntry::debit(ledgers.salaries.clone(), gross));

    let mut payable = |ledger: &str, label: &str, amount: BigDecimal| {
        if amount > zero() {
            voucher.add_entry(
                VoucherEntry::credit(ledger.to_string(), amount)
                    .with_description(label.to_string()),
            );
        }
    };
    payable(&ledgers.salary_payable, "Net pay", net);
    payable(&ledgers.pf_payable, "Provident fund withheld", pf);
    payable(&ledgers.professional_tax_payable, "Professional tax withheld", pt);
    payable(&ledgers.tds_payable, "TDS withheld", tds);

    voucher.validate()?;
    Ok(voucher)
}

/// Commission accrued for a delivered order: each line contributes
/// `price x quantity x rate / 100`, with the rate looked up by item
/// category in the assignee's rate table. Categories without a rate
/// contribute nothing.
pub fn commission_for_items(
    items: &[OrderItem],
    rates: &HashMap<String, BigDecimal>,
) -> BigDecimal {
    items
        .iter()
        .filter_map(|item| {
            rates.get(&item.category).map(|rate| {
                &item.price * &item.quantity * rate / BigDecimal::from(100)
            })
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{CounterpartyRef, EmployeePay, InvoiceItem};
    use crate::tax::split_gst;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    fn invoice(amount_paid: i32) -> InvoiceCreated {
        InvoiceCreated {
            invoice_id: "inv-1".to_string(),
            date: date(),
            counterparty: CounterpartyRef::Party("p-1".to_string()),
            customer_name: "Asha Traders".to_string(),
            customer_email: None,
            party_gstin: Some("27BBBBB0000B1Z5".to_string()),
            grand_total: BigDecimal::from(11800),
            taxable_amount: BigDecimal::from(10000),
            total_tax: BigDecimal::from(1800),
            amount_paid: BigDecimal::from(amount_paid),
            items: vec![],
        }
    }

    fn full_ledgers() -> SalesLedgers {
        SalesLedgers {
            customer: "customer".to_string(),
            sales: Some("sales".to_string()),
            cgst_output: Some("cgst".to_string()),
            sgst_output: Some("sgst".to_string()),
            igst_output: Some("igst".to_string()),
            customer_advances: Some("advances".to_string()),
            cost_of_goods_sold: Some("cogs".to_string()),
            finished_goods: Some("fg".to_string()),
        }
    }

    fn entry_amount(voucher: &JournalVoucher, account: &str, entry_type: EntryType) -> BigDecimal {
        voucher
            .entries
            .iter()
            .filter(|e| e.account_id == account && e.entry_type == entry_type)
            .map(|e| &e.amount)
            .sum()
    }

    #[test]
    fn test_advance_receipt_balances() {
        let order = OrderCreated {
            order_id: "ord-1".to_string(),
            date: date(),
            counterparty: CounterpartyRef::Inline {
                name: "Asha Traders".to_string(),
                email: None,
            },
            customer_name: "Asha Traders".to_string(),
            customer_email: None,
            payment_received: BigDecimal::from(5000),
        };

        let voucher = build_advance_receipt(
            &order,
            "bank",
            "customer",
            IdempotencyKey::new("order", "ord-1"),
        )
        .unwrap();

        assert_eq!(voucher.voucher_type, VoucherType::AdvanceReceipt);
        assert_eq!(entry_amount(&voucher, "bank", EntryType::Debit), BigDecimal::from(5000));
        assert_eq!(
            entry_amount(&voucher, "customer", EntryType::Credit),
            BigDecimal::from(5000)
        );
        assert!(voucher.is_balanced());
    }

    #[test]
    fn test_intrastate_sales_voucher() {
        let invoice = invoice(0);
        let split = split_gst("27AAAAA0000A1Z5", invoice.party_gstin.as_deref(), &invoice.total_tax);

        let vouchers = build_sales_vouchers(
            &invoice,
            &split,
            &full_ledgers(),
            &[],
            IdempotencyKey::new("invoice", "inv-1"),
        )
        .unwrap();

        assert_eq!(vouchers.len(), 1);
        let main = &vouchers[0];
        assert_eq!(entry_amount(main, "customer", EntryType::Debit), BigDecimal::from(11800));
        assert_eq!(entry_amount(main, "sales", EntryType::Credit), BigDecimal::from(10000));
        assert_eq!(entry_amount(main, "cgst", EntryType::Credit), BigDecimal::from(900));
        assert_eq!(entry_amount(main, "sgst", EntryType::Credit), BigDecimal::from(900));
        assert_eq!(entry_amount(main, "igst", EntryType::Credit), BigDecimal::from(0));
        assert!(main.is_balanced());
    }

    #[test]
    fn test_interstate_sales_voucher_credits_only_igst() {
        let mut invoice = invoice(0);
        invoice.party_gstin = Some("08CCCCC0000C1Z5".to_string());
        let split = split_gst("27AAAAA0000A1Z5", invoice.party_gstin.as_deref(), &invoice.total_tax);

        let vouchers = build_sales_vouchers(
            &invoice,
            &split,
            &full_ledgers(),
            &[],
            IdempotencyKey::new("invoice", "inv-1"),
        )
        .unwrap();

        let main = &vouchers[0];
        assert_eq!(entry_amount(main, "igst", EntryType::Credit), BigDecimal::from(1800));
        assert!(!main.entries.iter().any(|e| e.account_id == "cgst"));
        assert!(!main.entries.iter().any(|e| e.account_id == "sgst"));
        assert!(main.is_balanced());
    }

    #[test]
    fn test_advance_paid_invoice_adds_adjustment_voucher() {
        let invoice = invoice(3000);
        let split = split_gst("27AAAAA0000A1Z5", invoice.party_gstin.as_deref(), &invoice.total_tax);

        let vouchers = build_sales_vouchers(
            &invoice,
            &split,
            &full_ledgers(),
            &[],
            IdempotencyKey::new("invoice", "inv-1"),
        )
        .unwrap();

        assert_eq!(vouchers.len(), 2);
        let adjustment = &vouchers[1];
        assert_eq!(adjustment.voucher_type, VoucherType::AdvanceAdjustment);
        assert_eq!(
            entry_amount(adjustment, "advances", EntryType::Debit),
            BigDecimal::from(3000)
        );
        assert_eq!(
            entry_amount(adjustment, "customer", EntryType::Credit),
            BigDecimal::from(3000)
        );
    }

    #[test]
    fn test_costed_items_add_cogs_voucher() {
        let mut invoice = invoice(0);
        invoice.items = vec![
            InvoiceItem {
                product_id: "prod-a".to_string(),
                quantity: BigDecimal::from(2),
            },
            InvoiceItem {
                product_id: "prod-b".to_string(),
                quantity: BigDecimal::from(1),
            },
        ];
        let split = split_gst("27AAAAA0000A1Z5", invoice.party_gstin.as_deref(), &invoice.total_tax);

        let items = vec![
            CostedItem {
                product_id: "prod-a".to_string(),
                quantity: BigDecimal::from(2),
                product: Some(Product {
                    id: "prod-a".to_string(),
                    name: "Widget".to_string(),
                    cost: Some(BigDecimal::from(150)),
                    coa_account_id: Some("inv-widgets".to_string()),
                }),
            },
            CostedItem {
                product_id: "prod-b".to_string(),
                quantity: BigDecimal::from(1),
                product: Some(Product {
                    id: "prod-b".to_string(),
                    name: "Gadget".to_string(),
                    cost: Some(BigDecimal::from(400)),
                    coa_account_id: None,
                }),
            },
        ];

        let vouchers = build_sales_vouchers(
            &invoice,
            &split,
            &full_ledgers(),
            &items,
            IdempotencyKey::new("invoice", "inv-1"),
        )
        .unwrap();

        assert_eq!(vouchers.len(), 2);
        let cogs = &vouchers[1];
        assert_eq!(cogs.voucher_type, VoucherType::CostOfGoodsSold);
        assert_eq!(entry_amount(cogs, "cogs", EntryType::Debit), BigDecimal::from(700));
        assert_eq!(
            entry_amount(cogs, "inv-widgets", EntryType::Credit),
            BigDecimal::from(300)
        );
        // prod-b has no inventory ledger of its own, so the default
        // finished-goods ledger takes the credit.
        assert_eq!(entry_amount(cogs, "fg", EntryType::Credit), BigDecimal::from(400));
        assert!(cogs.is_balanced());
    }

    #[test]
    fn test_unknown_cost_items_build_no_cogs_voucher() {
        let mut invoice = invoice(0);
        invoice.items = vec![InvoiceItem {
            product_id: "prod-a".to_string(),
            quantity: BigDecimal::from(2),
        }];
        let split = split_gst("27AAAAA0000A1Z5", invoice.party_gstin.as_deref(), &invoice.total_tax);

        let items = vec![CostedItem {
            product_id: "prod-a".to_string(),
            quantity: BigDecimal::from(2),
            product: Some(Product {
                id: "prod-a".to_string(),
                name: "Widget".to_string(),
                cost: None,
                coa_account_id: None,
            }),
        }];

        let vouchers = build_sales_vouchers(
            &invoice,
            &split,
            &full_ledgers(),
            &items,
            IdempotencyKey::new("invoice", "inv-1"),
        )
        .unwrap();

        assert_eq!(vouchers.len(), 1);
    }

    #[test]
    fn test_missing_sales_ledger_aborts() {
        let invoice = invoice(0);
        let split = split_gst("27AAAAA0000A1Z5", invoice.party_gstin.as_deref(), &invoice.total_tax);
        let ledgers = SalesLedgers {
            sales: None,
            ..full_ledgers()
        };

        let result = build_sales_vouchers(
            &invoice,
            &split,
            &ledgers,
            &[],
            IdempotencyKey::new("invoice", "inv-1"),
        );

        assert!(matches!(result, Err(PostingError::MissingLedger(name)) if name == "Sales"));
    }

    #[test]
    fn test_missing_sgst_ledger_drops_only_that_bucket() {
        let invoice = invoice(0);
        let split = split_gst("27AAAAA0000A1Z5", invoice.party_gstin.as_deref(), &invoice.total_tax);
        let ledgers = SalesLedgers {
            sgst_output: None,
            ..full_ledgers()
        };

        let vouchers = build_sales_vouchers(
            &invoice,
            &split,
            &ledgers,
            &[],
            IdempotencyKey::new("invoice", "inv-1"),
        )
        .unwrap();

        let main = &vouchers[0];
        assert_eq!(entry_amount(main, "cgst", EntryType::Credit), BigDecimal::from(900));
        assert!(!main.entries.iter().any(|e| e.account_id == "sgst"));
        // The customer debit shrinks by the dropped bucket so the voucher
        // still balances.
        assert_eq!(entry_amount(main, "customer", EntryType::Debit), BigDecimal::from(10900));
        assert!(main.is_balanced());
    }

    #[test]
    fn test_grn_voucher_balances() {
        let grn = GrnRecorded {
            grn_id: "grn-1".to_string(),
            date: date(),
            counterparty: CounterpartyRef::Inline {
                name: "Mehta Mills".to_string(),
                email: None,
            },
            supplier_name: "Mehta Mills".to_string(),
            supplier_email: None,
            total_value: BigDecimal::from(8200),
        };

        let voucher =
            build_grn_voucher(&grn, "fg", "supplier", IdempotencyKey::new("grn", "grn-1")).unwrap();

        assert_eq!(entry_amount(&voucher, "fg", EntryType::Debit), BigDecimal::from(8200));
        assert_eq!(
            entry_amount(&voucher, "supplier", EntryType::Credit),
            BigDecimal::from(8200)
        );
    }

    fn payroll_run() -> PayrollRun {
        PayrollRun {
            period: "2025-06".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            employees: vec![
                EmployeePay {
                    employee_id: "emp-1".to_string(),
                    gross: BigDecimal::from(50000),
                    net: BigDecimal::from(43000),
                    pf: BigDecimal::from(3600),
                    professional_tax: BigDecimal::from(200),
                    tds: BigDecimal::from(3200),
                },
                EmployeePay {
                    employee_id: "emp-2".to_string(),
                    gross: BigDecimal::from(30000),
                    net: BigDecimal::from(27640),
                    pf: BigDecimal::from(2160),
                    professional_tax: BigDecimal::from(200),
                    tds: BigDecimal::from(0),
                },
            ],
        }
    }

    fn payroll_ledgers() -> PayrollLedgers {
        PayrollLedgers {
            salaries: "salaries".to_string(),
            salary_payable: "salary-payable".to_string(),
            pf_payable: "pf-payable".to_string(),
            professional_tax_payable: "pt-payable".to_string(),
            tds_payable: "tds-payable".to_string(),
        }
    }

    #[test]
    fn test_payroll_voucher_sums_across_employees() {
        let voucher = build_payroll_voucher(
            &payroll_run(),
            &payroll_ledgers(),
            IdempotencyKey::new("payroll", "2025-06"),
        )
        .unwrap();

        assert_eq!(
            entry_amount(&voucher, "salaries", EntryType::Debit),
            BigDecimal::from(80000)
        );
        assert_eq!(
            entry_amount(&voucher, "salary-payable", EntryType::Credit),
            BigDecimal::from(70640)
        );
        assert_eq!(
            entry_amount(&voucher, "pf-payable", EntryType::Credit),
            BigDecimal::from(5760)
        );
        assert_eq!(
            entry_amount(&voucher, "pt-payable", EntryType::Credit),
            BigDecimal::from(400)
        );
        assert_eq!(
            entry_amount(&voucher, "tds-payable", EntryType::Credit),
            BigDecimal::from(3200)
        );
        assert!(voucher.is_balanced());
    }

    #[test]
    fn test_unreconciled_payroll_is_rejected() {
        let mut run = payroll_run();
        run.employees[0].net = BigDecimal::from(42000);

        let result = build_payroll_voucher(
            &run,
            &payroll_ledgers(),
            IdempotencyKey::new("payroll", "2025-06"),
        );

        assert!(matches!(result, Err(PostingError::Validation(_))));
    }

    #[test]
    fn test_commission_accumulates_over_rated_categories() {
        let items = vec![
            OrderItem {
                category: "apparel".to_string(),
                price: BigDecimal::from(1000),
                quantity: BigDecimal::from(3),
            },
            OrderItem {
                category: "footwear".to_string(),
                price: BigDecimal::from(2000),
                quantity: BigDecimal::from(1),
            },
            OrderItem {
                category: "unrated".to_string(),
                price: BigDecimal::from(500),
                quantity: BigDecimal::from(10),
            },
        ];
        let mut rates = HashMap::new();
        rates.insert("apparel".to_string(), BigDecimal::from(5));
        rates.insert("footwear".to_string(), BigDecimal::from_str("2.5").unwrap());

        let commission = commission_for_items(&items, &rates);

        // 3000 * 5% + 2000 * 2.5% = 150 + 50
        assert_eq!(commission, BigDecimal::from(200));
    }

    #[test]
    fn test_commission_is_zero_without_rates() {
        let items = vec![OrderItem {
            category: "apparel".to_string(),
            price: BigDecimal::from(1000),
            quantity: BigDecimal::from(1),
        }];

        assert_eq!(commission_for_items(&items, &HashMap::new()), BigDecimal::from(0));
    }
}
