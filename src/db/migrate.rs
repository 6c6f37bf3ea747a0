use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior, params};

/// A schema step, applied at most once and remembered in the `log` table.
struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20240301_0001_key_management",
        description: "Created key_items, key_assignments and key_protocols tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS user_profiles (
            id             TEXT PRIMARY KEY,
            display_name   TEXT NOT NULL DEFAULT '',
            contract_type  TEXT NOT NULL CHECK(contract_type IN ('fixed_salary','hourly'))
        );

        CREATE TABLE IF NOT EXISTS key_items (
            id          TEXT PRIMARY KEY,
            label       TEXT NOT NULL DEFAULT '',
            status      TEXT NOT NULL DEFAULT 'available'
                        CHECK(status IN ('available','issued','lost')),
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS key_assignments (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            key_item_id        TEXT NOT NULL REFERENCES key_items(id),
            holder_profile_id  TEXT NOT NULL REFERENCES user_profiles(id),
            issued_at          TEXT NOT NULL,
            returned_at        TEXT,
            status             TEXT NOT NULL DEFAULT 'active'
                               CHECK(status IN ('active','returned','lost'))
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_key_assignments_one_active
            ON key_assignments(key_item_id) WHERE status = 'active';
        CREATE INDEX IF NOT EXISTS idx_key_assignments_holder
            ON key_assignments(holder_profile_id);

        CREATE TABLE IF NOT EXISTS key_protocols (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            action          TEXT NOT NULL CHECK(action IN ('issue','return','lost','reactivate')),
            key_item_id     TEXT NOT NULL REFERENCES key_items(id),
            assignment_id   INTEGER REFERENCES key_assignments(id),
            acting_user_id  TEXT,
            created_at      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_key_protocols_item ON key_protocols(key_item_id);
        "#,
    },
    Migration {
        version: "20240301_0002_hrp_event_log",
        description: "Created hrp_event_log table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS hrp_event_log (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id      TEXT NOT NULL,
            ip_address   TEXT NOT NULL DEFAULT '',
            entry_type   TEXT NOT NULL CHECK(entry_type IN ('live','manual','correction')),
            event_type   TEXT NOT NULL
                         CHECK(event_type IN ('start','end','break_start','break_end')),
            logged_date  TEXT NOT NULL,
            logged_time  TEXT NOT NULL,
            comment      TEXT,
            created_at   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_hrp_user_date
            ON hrp_event_log(user_id, logged_date, logged_time);

        CREATE TRIGGER IF NOT EXISTS trg_hrp_no_update
            BEFORE UPDATE ON hrp_event_log
            BEGIN SELECT RAISE(ABORT, 'hrp_event_log is append-only'); END;
        CREATE TRIGGER IF NOT EXISTS trg_hrp_no_delete
            BEFORE DELETE ON hrp_event_log
            BEGIN SELECT RAISE(ABORT, 'hrp_event_log is append-only'); END;
        "#,
    },
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

fn is_applied(conn: &Connection, version: &str) -> rusqlite::Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Apply one step unless another process already did.
///
/// The check runs inside the same `IMMEDIATE` transaction as the script,
/// so concurrent openers of a fresh database record each version once.
fn apply(conn: &Connection, m: &Migration) -> AppResult<bool> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

    if is_applied(&tx, m.version)? {
        return Ok(false);
    }

    tx.execute_batch(m.sql)
        .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        params![m.version, m.description],
    )?;
    tx.commit()?;

    success(format!("Migration applied: {} → {}", m.version, m.description));
    Ok(true)
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db() and by `bsnexus db --migrate`.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            apply(conn, m)?;
        }
    }

    Ok(())
}

/// Versions recorded as applied, oldest first.
pub fn applied_versions(conn: &Connection) -> AppResult<Vec<String>> {
    ensure_log_table(conn)?;
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
