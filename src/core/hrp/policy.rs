//! Who may still amend an HRP entry, and for how long.

use crate::errors::{AppError, AppResult};
use crate::models::contract_type::ContractType;
use chrono::NaiveDate;

pub const FIXED_SALARY_EDIT_DAYS: i64 = 7;
// The user-facing text below says 30 days; 90 is what is enforced.
pub const HOURLY_EDIT_DAYS: i64 = 90;

const FIXED_SALARY_MESSAGE: &str =
    "Einträge können nur bis zu 7 Tage rückwirkend bearbeitet werden.";
const HOURLY_MESSAGE: &str = "Einträge können nur bis zu 30 Tage rückwirkend bearbeitet werden.";

/// Absolute distance in calendar days; time-of-day never enters.
pub fn day_distance(today: NaiveDate, entry_date: NaiveDate) -> i64 {
    (today - entry_date).num_days().abs()
}

/// Decide whether an entry dated `entry_date` may still be changed.
pub fn can_modify_contract(
    contract: ContractType,
    entry_date: NaiveDate,
    today: NaiveDate,
) -> AppResult<()> {
    let (limit, message) = match contract {
        ContractType::FixedSalary => (FIXED_SALARY_EDIT_DAYS, FIXED_SALARY_MESSAGE),
        ContractType::Hourly => (HOURLY_EDIT_DAYS, HOURLY_MESSAGE),
    };

    if day_distance(today, entry_date) > limit {
        return Err(AppError::EditWindowExpired(message.to_string()));
    }
    Ok(())
}

/// String-typed entry point: unknown contract names are rejected with
/// `UnknownContractType` before any date arithmetic happens.
pub fn can_modify(contract_type: &str, entry_date: NaiveDate, today: NaiveDate) -> AppResult<()> {
    let contract = ContractType::parse(contract_type)?;
    can_modify_contract(contract, entry_date, today)
}
