//! Sequential, human-readable document numbering
//!
//! Numbers look like `SO-2506-0001`: a type code, the two-digit year and
//! month of the document date, and a zero-padded counter. Allocation reads
//! an explicit per-prefix counter; the counter bump is returned as a write
//! op so the caller commits it atomically with the consuming document,
//! which is what makes concurrent allocations collision-free.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::traits::{PostingStore, WriteOp};
use crate::types::PostingResult;

/// Document types that receive sequential numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    SalesOrder,
    Quotation,
}

impl DocumentKind {
    /// Type code used as the number prefix
    pub fn code(&self) -> &'static str {
        match self {
            DocumentKind::SalesOrder => "SO",
            DocumentKind::Quotation => "QT",
        }
    }

    /// Prefix shared by all numbers of this kind within a month,
    /// e.g. `SO-2506-`
    pub fn period_prefix(&self, date: NaiveDate) -> String {
        format!("{}-{}-", self.code(), date.format("%y%m"))
    }
}

/// A freshly allocated number plus the counter write that reserves it
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceAllocation {
    pub number: String,
    pub counter_write: WriteOp,
}

/// Parse the trailing numeric segment of an issued number, falling back to
/// zero when the tail is not numeric.
pub fn parse_trailing_number(number: &str) -> u64 {
    number
        .rsplit('-')
        .next()
        .and_then(|tail| tail.parse::<u64>().ok())
        .unwrap_or(0)
}

/// Document number sequencer over a posting store
pub struct DocumentSequencer<S: PostingStore> {
    store: S,
}

impl<S: PostingStore> DocumentSequencer<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Allocate the next number for `(kind, period-of-date)`.
    ///
    /// The first allocation of a period seeds the counter from the
    /// greatest number already issued with that prefix, so documents
    /// numbered before the counter existed keep the sequence intact. The
    /// returned counter write must land in the same commit as the document
    /// that consumes the number.
    pub async fn allocate(
        &self,
        kind: DocumentKind,
        date: NaiveDate,
    ) -> PostingResult<SequenceAllocation> {
        let prefix = kind.period_prefix(date);

        let current = match self.store.get_counter(&prefix).await? {
            Some(value) => value,
            None => match self.store.max_document_number(&prefix).await? {
                Some(number) => parse_trailing_number(&number),
                None => 0,
            },
        };

        let next = current + 1;
        Ok(SequenceAllocation {
            number: format!("{}{:04}", prefix, next),
            counter_write: WriteOp::SetCounter {
                prefix,
                value: next,
            },
        })
    }
}
