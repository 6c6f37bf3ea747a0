//! SQL for key items, key assignments and the key protocol.

use crate::errors::{AppError, AppResult};
use crate::models::key_assignment::{AssignmentStatus, KeyAssignment};
use crate::models::key_item::{KeyItem, KeyStatus};
use crate::models::protocol::{KeyProtocolEntry, ProtocolAction};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn bad_column(col: usize, what: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        col,
        rusqlite::types::Type::Text,
        Box::new(AppError::InvalidInput(what)),
    )
}

// ---------------------------
// key_items
// ---------------------------

pub fn map_item(row: &Row) -> Result<KeyItem> {
    let status_str: String = row.get("status")?;
    let status = KeyStatus::from_db_str(&status_str)
        .ok_or_else(|| bad_column(2, format!("Invalid key status: {}", status_str)))?;

    Ok(KeyItem {
        id: row.get("id")?,
        label: row.get("label")?,
        status,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_item(conn: &Connection, id: &str, label: &str) -> AppResult<KeyItem> {
    let created_at = Local::now().to_rfc3339();
    conn.execute(
        "INSERT INTO key_items (id, label, status, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![id, label, KeyStatus::Available.to_db_str(), created_at],
    )?;

    Ok(KeyItem {
        id: id.to_string(),
        label: label.to_string(),
        status: KeyStatus::Available,
        created_at,
    })
}

pub fn find_item(conn: &Connection, id: &str) -> AppResult<Option<KeyItem>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM key_items WHERE id = ?1")?;
    Ok(stmt.query_row([id], map_item).optional()?)
}

pub fn get_item(conn: &Connection, id: &str) -> AppResult<KeyItem> {
    find_item(conn, id)?.ok_or_else(|| AppError::not_found("Key item", id))
}

pub fn load_items(conn: &Connection) -> AppResult<Vec<KeyItem>> {
    let mut stmt = conn.prepare("SELECT * FROM key_items ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_item)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn set_item_status(conn: &Connection, id: &str, status: KeyStatus) -> AppResult<()> {
    conn.execute(
        "UPDATE key_items SET status = ?1 WHERE id = ?2",
        params![status.to_db_str(), id],
    )?;
    Ok(())
}

// ---------------------------
// key_assignments
// ---------------------------

pub fn map_assignment(row: &Row) -> Result<KeyAssignment> {
    let status_str: String = row.get("status")?;
    let status = AssignmentStatus::from_db_str(&status_str)
        .ok_or_else(|| bad_column(5, format!("Invalid assignment status: {}", status_str)))?;

    Ok(KeyAssignment {
        id: row.get("id")?,
        key_item_id: row.get("key_item_id")?,
        holder_profile_id: row.get("holder_profile_id")?,
        issued_at: row.get("issued_at")?,
        returned_at: row.get("returned_at")?,
        status,
    })
}

/// Insert an `active` assignment and return its id.
pub fn insert_assignment(conn: &Connection, key_item_id: &str, holder: &str) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO key_assignments (key_item_id, holder_profile_id, issued_at, status)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            key_item_id,
            holder,
            Local::now().to_rfc3339(),
            AssignmentStatus::Active.to_db_str()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_assignment(conn: &Connection, id: i64) -> AppResult<Option<KeyAssignment>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM key_assignments WHERE id = ?1")?;
    Ok(stmt.query_row([id], map_assignment).optional()?)
}

pub fn get_assignment(conn: &Connection, id: i64) -> AppResult<KeyAssignment> {
    find_assignment(conn, id)?.ok_or_else(|| AppError::not_found("Assignment", id))
}

/// Close an assignment. `returned_at` is stamped only when returning.
pub fn close_assignment(conn: &Connection, id: i64, status: AssignmentStatus) -> AppResult<()> {
    let returned_at = (status == AssignmentStatus::Returned).then(|| Local::now().to_rfc3339());
    conn.execute(
        "UPDATE key_assignments SET status = ?1, returned_at = ?2 WHERE id = ?3",
        params![status.to_db_str(), returned_at, id],
    )?;
    Ok(())
}

pub fn load_assignments(
    conn: &Connection,
    holder: Option<&str>,
    active_only: bool,
) -> AppResult<Vec<KeyAssignment>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM key_assignments
         WHERE (?1 IS NULL OR holder_profile_id = ?1)
           AND (?2 = 0 OR status = 'active')
         ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![holder, active_only], map_assignment)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------
// key_protocols
// ---------------------------

pub fn map_protocol(row: &Row) -> Result<KeyProtocolEntry> {
    let action_str: String = row.get("action")?;
    let action = ProtocolAction::from_db_str(&action_str)
        .ok_or_else(|| bad_column(1, format!("Invalid protocol action: {}", action_str)))?;

    Ok(KeyProtocolEntry {
        id: row.get("id")?,
        action,
        key_item_id: row.get("key_item_id")?,
        assignment_id: row.get("assignment_id")?,
        acting_user_id: row.get("acting_user_id")?,
        created_at: row.get("created_at")?,
    })
}

/// Append a protocol entry and return its id.
pub fn insert_protocol(
    conn: &Connection,
    action: ProtocolAction,
    key_item_id: &str,
    assignment_id: Option<i64>,
    acting_user_id: Option<&str>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO key_protocols (action, key_item_id, assignment_id, acting_user_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            action.to_db_str(),
            key_item_id,
            assignment_id,
            acting_user_id,
            Local::now().to_rfc3339()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_protocol(conn: &Connection, id: i64) -> AppResult<Option<KeyProtocolEntry>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM key_protocols WHERE id = ?1")?;
    Ok(stmt.query_row([id], map_protocol).optional()?)
}

pub fn load_protocol(conn: &Connection, key_item_id: Option<&str>) -> AppResult<Vec<KeyProtocolEntry>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM key_protocols
         WHERE (?1 IS NULL OR key_item_id = ?1)
         ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![key_item_id], map_protocol)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
