//! Chart-of-accounts resolution for counterparties
//!
//! Finds or lazily creates the ledger account behind a customer or
//! supplier: cached reference on the party record first, then an
//! exact-name search, then a new account with role-appropriate defaults.
//! Every read here and every write it produces belong to one posting
//! cycle, so two concurrent events naming the same counterparty cannot
//! create two ledgers - the loser's commit conflicts and re-runs against
//! the winner's account.

use tracing::info;
use uuid::Uuid;

use crate::events::CounterpartyRef;
use crate::traits::{PostingStore, WriteOp};
use crate::types::*;
use crate::utils::validation::validate_account_name;

/// Sentinel ledger id that must never be treated as a party's own account.
/// Legacy data points some parties at the shared advances ledger.
pub const CUSTOMER_ADVANCES_SENTINEL: &str = "customer-advances";

/// Role of the counterparty, deciding the defaults for a new account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterpartyRole {
    Customer,
    Supplier,
}

impl CounterpartyRole {
    fn nature(&self) -> AccountNature {
        match self {
            CounterpartyRole::Customer => AccountNature::Asset,
            CounterpartyRole::Supplier => AccountNature::Liability,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            CounterpartyRole::Customer => "RECEIVABLE",
            CounterpartyRole::Supplier => "PAYABLE",
        }
    }
}

/// Outcome of a resolution: the ledger id to post against plus the writes
/// (account creation, party back-fill) the caller must include in its
/// commit batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLedger {
    pub ledger_id: String,
    pub writes: Vec<WriteOp>,
}

impl ResolvedLedger {
    fn existing(ledger_id: String) -> Self {
        Self {
            ledger_id,
            writes: Vec::new(),
        }
    }
}

/// Ledger resolver over a posting store
pub struct LedgerResolver<S: PostingStore> {
    store: S,
}

impl<S: PostingStore> LedgerResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Resolve the ledger account for a counterparty, creating one when
    /// neither the party record nor an exact-name search yields a match.
    /// First match wins:
    ///
    /// 1. the party's cached `coa_ledger_id`, when it still exists and is
    ///    not the shared advances sentinel;
    /// 2. the unique active ledger with the exact display name, back-filled
    ///    onto the party;
    /// 3. a new account with the role's defaults, back-filled onto the
    ///    party together with its contact details.
    pub async fn resolve_or_create(
        &self,
        counterparty: &CounterpartyRef,
        display_name: &str,
        email: Option<&str>,
        role: CounterpartyRole,
    ) -> PostingResult<ResolvedLedger> {
        validate_account_name(display_name)?;

        let party = match counterparty {
            CounterpartyRef::Party(party_id) => Some(
                self.store
                    .get_party(party_id)
                    .await?
                    .ok_or_else(|| PostingError::PartyNotFound(party_id.clone()))?,
            ),
            CounterpartyRef::Inline { .. } => None,
        };

        if let Some(party) = &party {
            if let Some(cached_id) = &party.coa_ledger_id {
                if cached_id != CUSTOMER_ADVANCES_SENTINEL
                    && self.store.get_ledger(cached_id).await?.is_some()
                {
                    return Ok(ResolvedLedger::existing(cached_id.clone()));
                }
            }
        }

        let candidates = self.store.find_ledgers_by_name(display_name).await?;
        let active: Vec<&LedgerAccount> =
            candidates.iter().filter(|l| l.is_active()).collect();

        match active.len() {
            1 => {
                let ledger_id = active[0].id.clone();
                let mut writes = Vec::new();
                if let Some(party) = party {
                    writes.push(WriteOp::PutParty(Party {
                        coa_ledger_id: Some(ledger_id.clone()),
                        ..party
                    }));
                }
                Ok(ResolvedLedger { ledger_id, writes })
            }
            0 if !candidates.is_empty() => {
                // Only inactive ledgers carry this name; creating another
                // would leave two same-named accounts to pick between later.
                Err(PostingError::ResolutionAmbiguity(
                    display_name.to_string(),
                    format!("{} inactive ledger(s) already use this name", candidates.len()),
                ))
            }
            0 => self.create_account(party, display_name, email, role),
            n => Err(PostingError::ResolutionAmbiguity(
                display_name.to_string(),
                format!("{} active ledgers share this name", n),
            )),
        }
    }

    fn create_account(
        &self,
        party: Option<Party>,
        display_name: &str,
        email: Option<&str>,
        role: CounterpartyRole,
    ) -> PostingResult<ResolvedLedger> {
        let account = LedgerAccount::new(
            Uuid::new_v4().to_string(),
            display_name.to_string(),
            role.nature(),
            role.kind().to_string(),
        );
        let ledger_id = account.id.clone();

        info!(
            ledger_id = %ledger_id,
            name = display_name,
            role = ?role,
            "creating ledger account for counterparty"
        );

        let mut writes = vec![WriteOp::PutLedger(account)];
        if let Some(party) = party {
            writes.push(WriteOp::PutParty(Party {
                name: display_name.to_string(),
                email: email.map(str::to_string).or(party.email.clone()),
                coa_ledger_id: Some(ledger_id.clone()),
                ..party
            }));
        }

        Ok(ResolvedLedger { ledger_id, writes })
    }
}
