use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

fn count(pool: &DbPool, sql: &str) -> rusqlite::Result<i64> {
    pool.conn.query_row(sql, [], |row| row.get(0))
}

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) KEY MANAGEMENT
    //
    let items = count(pool, "SELECT COUNT(*) FROM key_items")?;
    let issued = count(pool, "SELECT COUNT(*) FROM key_items WHERE status = 'issued'")?;
    let lost = count(pool, "SELECT COUNT(*) FROM key_items WHERE status = 'lost'")?;
    let protocols = count(pool, "SELECT COUNT(*) FROM key_protocols")?;

    println!(
        "{}• Key items:{} {}{}{} ({} issued, {} lost)",
        CYAN, RESET, GREEN, items, RESET, issued, lost
    );
    println!("{}• Protocol entries:{} {}", CYAN, RESET, protocols);

    //
    // 3) HRP
    //
    let entries = count(pool, "SELECT COUNT(*) FROM hrp_event_log")?;
    println!("{}• HRP entries:{} {}{}{}", CYAN, RESET, GREEN, entries, RESET);

    let first_date: Option<String> = pool
        .conn
        .query_row("SELECT MIN(logged_date) FROM hrp_event_log", [], |row| row.get(0))
        .optional()?
        .flatten();
    let last_date: Option<String> = pool
        .conn
        .query_row("SELECT MAX(logged_date) FROM hrp_event_log", [], |row| row.get(0))
        .optional()?
        .flatten();

    let fmt_first = first_date.unwrap_or_else(|| format!("{GREY}--{RESET}"));
    let fmt_last = last_date.unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• HRP date range:{}", CYAN, RESET);
    println!("    from: {}", fmt_first);
    println!("    to:   {}", fmt_last);

    println!();
    Ok(())
}
