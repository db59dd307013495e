//! Posting configuration: company identity and well-known ledger names

use serde::{Deserialize, Serialize};

/// Names of the ledgers the voucher builders post against. These are
/// looked up by exact name at posting time; a missing required ledger
/// aborts the posting attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerNames {
    pub sales: String,
    pub cgst_output: String,
    pub sgst_output: String,
    pub igst_output: String,
    pub cost_of_goods_sold: String,
    pub finished_goods: String,
    pub customer_advances: String,
    pub salaries: String,
    pub salary_payable: String,
    pub pf_payable: String,
    pub professional_tax_payable: String,
    pub tds_payable: String,
}

impl Default for LedgerNames {
    fn default() -> Self {
        Self {
            sales: "Sales".to_string(),
            cgst_output: "CGST Output".to_string(),
            sgst_output: "SGST Output".to_string(),
            igst_output: "IGST Output".to_string(),
            cost_of_goods_sold: "Cost of Goods Sold".to_string(),
            finished_goods: "Finished Goods".to_string(),
            customer_advances: "Customer Advances".to_string(),
            salaries: "Salaries".to_string(),
            salary_payable: "Salary Payable".to_string(),
            pf_payable: "PF Payable".to_string(),
            professional_tax_payable: "Professional Tax Payable".to_string(),
            tds_payable: "TDS Payable".to_string(),
        }
    }
}

/// Company-level posting configuration, passed explicitly into the poster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostingConfig {
    /// Company GSTIN; its two-character prefix decides inter vs intra state
    pub company_gstin: String,
    /// Primary UPI id, matched against bank ledgers for advance receipts
    pub primary_upi_id: Option<String>,
    /// Cash ledger used when no bank ledger matches the UPI id
    pub default_cash_ledger_id: String,
    /// Ledger names the builders resolve at posting time
    pub ledger_names: LedgerNames,
    /// Bound on optimistic commit retries before a cycle aborts
    pub max_commit_retries: u32,
}

impl Default for PostingConfig {
    fn default() -> Self {
        Self {
            company_gstin: String::new(),
            primary_upi_id: None,
            default_cash_ledger_id: "cash".to_string(),
            ledger_names: LedgerNames::default(),
            max_commit_retries: 5,
        }
    }
}
