//! SQL for the append-only HRP event log.
//!
//! The logged wall-clock instant is stored split into `logged_date`
//! ("YYYY-MM-DD") and `logged_time` ("HH:MM:SS[.fff]") so that day and
//! month lookups stay plain string comparisons on an indexed column.
//! Fractions are written in groups of 3, 6 or 9 digits, which keeps the
//! text order equal to the time order.

use crate::errors::{AppError, AppResult};
use crate::models::hrp_entry::{EntryType, HrpEventLogEntry, HrpEventType};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};
use std::collections::BTreeSet;

/// `%.f` writes nothing for whole seconds.
const TIME_FORMAT: &str = "%H:%M:%S%.f";

fn conversion(col: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(err))
}

pub fn map_row(row: &Row) -> Result<HrpEventLogEntry> {
    let date_str: String = row.get("logged_date")?;
    let time_str: String = row.get("logged_time")?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| conversion(5, AppError::InvalidDate(date_str.clone())))?;
    let time = NaiveTime::parse_from_str(&time_str, TIME_FORMAT)
        .map_err(|_| conversion(6, AppError::MalformedTimestamp(time_str.clone())))?;

    let entry_str: String = row.get("entry_type")?;
    let entry_type = EntryType::from_db_str(&entry_str).ok_or_else(|| {
        conversion(3, AppError::InvalidInput(format!("Invalid entry type: {}", entry_str)))
    })?;

    let event_str: String = row.get("event_type")?;
    let event_type = HrpEventType::from_db_str(&event_str).ok_or_else(|| {
        conversion(4, AppError::InvalidInput(format!("Invalid event type: {}", event_str)))
    })?;

    let ip: String = row.get("ip_address")?;

    Ok(HrpEventLogEntry {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        ip_address: (!ip.is_empty()).then_some(ip),
        entry_type,
        event_type,
        logged_at: NaiveDateTime::new(date, time),
        comment: row.get("comment")?,
        created_at: row.get("created_at")?,
    })
}

/// Append one row and return its id. There is no update counterpart.
pub fn insert_entry(
    conn: &Connection,
    user_id: &str,
    ip_address: &str,
    entry_type: EntryType,
    event_type: HrpEventType,
    logged_at: NaiveDateTime,
    comment: Option<&str>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO hrp_event_log
            (user_id, ip_address, entry_type, event_type, logged_date, logged_time, comment, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            user_id,
            ip_address,
            entry_type.to_db_str(),
            event_type.to_db_str(),
            logged_at.format("%Y-%m-%d").to_string(),
            logged_at.format(TIME_FORMAT).to_string(),
            comment,
            Local::now().to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_entry(conn: &Connection, id: i64) -> AppResult<Option<HrpEventLogEntry>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM hrp_event_log WHERE id = ?1")?;
    Ok(stmt.query_row([id], map_row).optional()?)
}

/// Day numbers in `[first, next_first)` with at least one entry for the user.
pub fn load_days_with_entries(
    conn: &Connection,
    user_id: &str,
    first: NaiveDate,
    next_first: NaiveDate,
) -> AppResult<BTreeSet<u32>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT CAST(strftime('%d', logged_date) AS INTEGER)
         FROM hrp_event_log
         WHERE user_id = ?1 AND logged_date >= ?2 AND logged_date < ?3",
    )?;

    let rows = stmt.query_map(
        params![
            user_id,
            first.format("%Y-%m-%d").to_string(),
            next_first.format("%Y-%m-%d").to_string()
        ],
        |row| row.get::<_, u32>(0),
    )?;

    let mut out = BTreeSet::new();
    for r in rows {
        out.insert(r?);
    }
    Ok(out)
}

/// Entries of one day, chronological; equal timestamps keep insertion order.
pub fn load_entries_by_date(
    conn: &Connection,
    user_id: &str,
    date: &NaiveDate,
) -> AppResult<Vec<HrpEventLogEntry>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM hrp_event_log
         WHERE user_id = ?1 AND logged_date = ?2
         ORDER BY logged_time ASC, id ASC",
    )?;

    let date_str = date.format("%Y-%m-%d").to_string();
    let rows = stmt.query_map(params![user_id, date_str], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Entries in `[first, last]` (inclusive), chronological.
pub fn load_entries_in_range(
    conn: &Connection,
    user_id: &str,
    first: &NaiveDate,
    last: &NaiveDate,
) -> AppResult<Vec<HrpEventLogEntry>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM hrp_event_log
         WHERE user_id = ?1 AND logged_date BETWEEN ?2 AND ?3
         ORDER BY logged_date ASC, logged_time ASC, id ASC",
    )?;

    let rows = stmt.query_map(
        params![
            user_id,
            first.format("%Y-%m-%d").to_string(),
            last.format("%Y-%m-%d").to_string()
        ],
        map_row,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
