//! CGST/SGST vs IGST allocation from GSTIN state prefixes
//!
//! A GSTIN's first two characters encode the taxpayer's state. When the
//! company and counterparty prefixes differ the supply is interstate and
//! the whole tax amount is IGST; otherwise it splits evenly between CGST
//! and SGST.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Jurisdictional allocation of a gross tax amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GstSplit {
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
}

impl GstSplit {
    pub fn total(&self) -> BigDecimal {
        &self.cgst + &self.sgst + &self.igst
    }

    pub fn is_interstate(&self) -> bool {
        self.igst > BigDecimal::from(0)
    }
}

/// Whether two GSTINs belong to the same state.
///
/// A missing counterparty GSTIN defaults to intrastate. The source system
/// behaves the same way; whether unregistered parties should instead be
/// rejected is a policy question, not decided here.
pub fn same_state(company_gstin: &str, party_gstin: Option<&str>) -> bool {
    match party_gstin {
        Some(party) => state_prefix(company_gstin) == state_prefix(party),
        None => true,
    }
}

fn state_prefix(gstin: &str) -> &str {
    let end = gstin
        .char_indices()
        .nth(2)
        .map(|(i, _)| i)
        .unwrap_or(gstin.len());
    &gstin[..end]
}

/// Split a gross tax amount into jurisdictional buckets.
///
/// The components always sum exactly to `amount`; a zero amount yields an
/// all-zero split.
pub fn split_gst(company_gstin: &str, party_gstin: Option<&str>, amount: &BigDecimal) -> GstSplit {
    if same_state(company_gstin, party_gstin) {
        let half = amount / BigDecimal::from(2);
        GstSplit {
            cgst: half.clone(),
            sgst: amount - &half,
            igst: BigDecimal::from(0),
        }
    } else {
        GstSplit {
            cgst: BigDecimal::from(0),
            sgst: BigDecimal::from(0),
            igst: amount.clone(),
        }
    }
}
