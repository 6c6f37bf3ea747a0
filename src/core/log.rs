use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use std::sync::LazyLock;

const MAX_OP_WIDTH: usize = 60;

static ANSI_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("valid ANSI pattern"));

/// Printable width of a string that may carry color codes.
fn visible_width(s: &str) -> usize {
    ANSI_ESCAPE.replace_all(s, "").chars().count()
}

fn color_for_operation(op: &str) -> Colour {
    match op {
        "key_issue" | "key_add" => Colour::Green,
        "key_return" | "key_reactivate" => Colour::Cyan,
        "key_lost" => Colour::Red,
        "hrp_log" => Colour::Blue,
        "hrp_correct" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &mut DbPool) -> AppResult<()> {
        let entries: Vec<(i64, String, String, String)> = load_log(&pool.conn)?
            .into_iter()
            .map(|(id, raw_date, operation, target, message)| {
                let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or(raw_date);

                let colored_op = color_for_operation(&operation).paint(operation).to_string();
                let op_target = if target.is_empty() {
                    colored_op
                } else {
                    format!("{colored_op} ({target})")
                };

                (id, date, op_target, message)
            })
            .collect();

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let id_w = entries
            .iter()
            .map(|(id, ..)| id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|(_, d, ..)| d.len()).max().unwrap_or(10);
        let op_w = entries
            .iter()
            .map(|(_, _, op, _)| visible_width(op))
            .max()
            .unwrap_or(10)
            .min(MAX_OP_WIDTH);

        println!("📜 Internal log:\n");

        for (id, date, op_target, message) in entries {
            let padding = " ".repeat(op_w.saturating_sub(visible_width(&op_target)));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                id,
                date,
                op_target,
                padding,
                message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
