use crate::db::migrate::run_pending_migrations;
use crate::errors::{AppError, AppResult};
use rusqlite::Connection;

/// Schema objects the lifecycle rules depend on, as (type, name).
pub const SCHEMA_GUARDS: &[(&str, &str)] = &[
    ("index", "idx_key_assignments_one_active"),
    ("trigger", "trg_hrp_no_update"),
    ("trigger", "trg_hrp_no_delete"),
];

/// Guards from [`SCHEMA_GUARDS`] that are absent from the database.
pub fn missing_guards(conn: &Connection) -> AppResult<Vec<&'static str>> {
    let mut stmt =
        conn.prepare_cached("SELECT 1 FROM sqlite_master WHERE type = ?1 AND name = ?2")?;

    let mut missing = Vec::new();
    for (kind, name) in SCHEMA_GUARDS {
        if !stmt.exists([kind, name])? {
            missing.push(*name);
        }
    }
    Ok(missing)
}

/// Bring the schema up to date and refuse to continue without its guards.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    run_pending_migrations(conn)?;

    let missing = missing_guards(conn)?;
    if !missing.is_empty() {
        return Err(AppError::Migration(format!(
            "schema is missing {}",
            missing.join(", ")
        )));
    }
    Ok(())
}
