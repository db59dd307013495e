//! Validation utilities

use crate::types::{PostingError, PostingResult};

/// Validate that a ledger account name is usable
pub fn validate_account_name(name: &str) -> PostingResult<()> {
    if name.trim().is_empty() {
        return Err(PostingError::Validation(
            "Account name cannot be empty".to_string(),
        ));
    }

    if name.len() > 100 {
        return Err(PostingError::Validation(
            "Account name cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate a payroll period key of the form `YYYY-MM`
pub fn validate_period_key(period: &str) -> PostingResult<()> {
    let well_formed = period.is_ascii()
        && period.len() == 7
        && period.as_bytes()[4] == b'-'
        && period[..4].chars().all(|c| c.is_ascii_digit())
        && period[5..].chars().all(|c| c.is_ascii_digit())
        && period[5..]
            .parse::<u8>()
            .is_ok_and(|month| (1..=12).contains(&month));

    if !well_formed {
        return Err(PostingError::Validation(format!(
            "Period key '{}' is not of the form YYYY-MM",
            period
        )));
    }

    Ok(())
}
