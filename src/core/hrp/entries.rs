use super::policy::can_modify_contract;
use super::validate::validate_timestamp_at;
use crate::db::hrp::{
    find_entry, insert_entry, load_days_with_entries, load_entries_by_date, load_entries_in_range,
};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::profiles::get_profile;
use crate::errors::{AppError, AppResult};
use crate::models::hrp_entry::{EntryType, HrpEventLogEntry, HrpEventType};
use chrono::{DateTime, Local, NaiveDate};
use rusqlite::Connection;
use std::collections::BTreeSet;

/// First day of the month and first day of the following month.
pub fn month_bounds(year: i32, month: u32) -> AppResult<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::InvalidDate(format!("{year:04}-{month:02}")))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| AppError::InvalidDate(format!("{year:04}-{month:02}")))?;
    Ok((first, next))
}

/// Everything a caller submits when clocking an event.
#[derive(Debug, Clone)]
pub struct NewHrpEvent<'a> {
    pub user_id: &'a str,
    pub ip_address: &'a str,
    pub event_type: HrpEventType,
    /// `None` clocks the event at `now`.
    pub timestamp: Option<&'a str>,
    pub comment: Option<&'a str>,
}

pub struct HrpLogic;

impl HrpLogic {
    /// Append one clock event after validating its timestamp.
    pub fn log_event(
        pool: &mut DbPool,
        event: &NewHrpEvent<'_>,
        now: DateTime<Local>,
        lookahead_minutes: i64,
    ) -> AppResult<HrpEventLogEntry> {
        let (logged_at, entry_type) = match event.timestamp {
            Some(raw) => (
                validate_timestamp_at(raw, now, lookahead_minutes)?,
                EntryType::Manual,
            ),
            None => (now, EntryType::Live),
        };

        pool.with_write_tx(|tx| {
            let id = insert_entry(
                tx,
                event.user_id,
                event.ip_address,
                entry_type,
                event.event_type,
                logged_at.naive_local(),
                event.comment,
            )?;

            ttlog(
                tx,
                "hrp_log",
                event.user_id,
                &format!(
                    "{} at {} ({})",
                    event.event_type.to_db_str(),
                    logged_at.format("%Y-%m-%d %H:%M:%S%.f"),
                    entry_type.to_db_str()
                ),
            )?;

            find_entry(tx, id)?.ok_or_else(|| AppError::not_found("HRP entry", id))
        })
    }

    /// Supersede an existing entry by appending a correction row.
    ///
    /// The caller must own the entry, and both the original date and the
    /// corrected date must lie inside the caller's edit window.
    #[allow(clippy::too_many_arguments)]
    pub fn correct_entry(
        pool: &mut DbPool,
        user_id: &str,
        entry_id: i64,
        new_timestamp: &str,
        event_type: Option<HrpEventType>,
        comment: Option<&str>,
        now: DateTime<Local>,
        lookahead_minutes: i64,
    ) -> AppResult<HrpEventLogEntry> {
        let corrected = validate_timestamp_at(new_timestamp, now, lookahead_minutes)?;
        let today = now.date_naive();

        let note = match comment {
            Some(c) if !c.trim().is_empty() => format!("Korrektur von #{}: {}", entry_id, c.trim()),
            _ => format!("Korrektur von #{}", entry_id),
        };

        pool.with_write_tx(|tx| {
            // Entries of other users are invisible, not forbidden.
            let original = find_entry(tx, entry_id)?
                .filter(|e| e.user_id == user_id)
                .ok_or_else(|| AppError::not_found("HRP entry", entry_id))?;

            let profile = get_profile(tx, user_id)?;
            can_modify_contract(profile.contract_type, original.date(), today)?;
            can_modify_contract(profile.contract_type, corrected.date_naive(), today)?;

            let id = insert_entry(
                tx,
                user_id,
                original.ip_address.as_deref().unwrap_or_default(),
                EntryType::Correction,
                event_type.unwrap_or(original.event_type),
                corrected.naive_local(),
                Some(&note),
            )?;

            ttlog(
                tx,
                "hrp_correct",
                user_id,
                &format!("#{} superseded by #{}", entry_id, id),
            )?;

            find_entry(tx, id)?.ok_or_else(|| AppError::not_found("HRP entry", id))
        })
    }

    /// Days of `year`-`month` on which the user logged at least one event.
    pub fn dates_with_entries(
        pool: &DbPool,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> AppResult<BTreeSet<u32>> {
        let (first, next) = month_bounds(year, month)?;
        load_days_with_entries(&pool.conn, user_id, first, next)
    }

    /// Entries of one day in chronological order.
    pub fn entries_for_date(
        pool: &DbPool,
        user_id: &str,
        year: i32,
        month: u32,
        day: u32,
        include_details: bool,
    ) -> AppResult<Vec<HrpEventLogEntry>> {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| AppError::InvalidDate(format!("{year:04}-{month:02}-{day:02}")))?;

        let entries = load_entries_by_date(&pool.conn, user_id, &date)?;

        Ok(if include_details {
            entries
        } else {
            entries
                .into_iter()
                .map(HrpEventLogEntry::without_details)
                .collect()
        })
    }
}

/// All entries of a month, chronological; read through the export's transaction.
pub(crate) fn month_entries(
    conn: &Connection,
    user_id: &str,
    year: i32,
    month: u32,
) -> AppResult<Vec<HrpEventLogEntry>> {
    let (first, next) = month_bounds(year, month)?;
    let last = next.pred_opt().unwrap_or(first);
    load_entries_in_range(conn, user_id, &first, &last)
}
