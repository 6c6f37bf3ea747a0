use super::open_db;
use crate::auth::{RoleGuard, SessionAuthority};
use crate::cli::parser::HrpCommand;
use crate::config::Config;
use crate::core::hrp::HrpLogic;
use crate::core::hrp::entries::NewHrpEvent;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::models::hrp_entry::HrpEventLogEntry;
use crate::ui::messages::{info, success};
use chrono::Local;

fn print_entry(e: &HrpEventLogEntry, details: bool) {
    let base = format!(
        "#{:<6} {} {:<11} {:<10}",
        e.id,
        e.logged_at.format("%H:%M:%S"),
        e.event_type.to_db_str(),
        e.entry_type.to_db_str()
    );

    if details {
        println!(
            "{} {:<15} {}",
            base,
            e.ip_address.as_deref().unwrap_or("--"),
            e.comment.as_deref().unwrap_or("")
        );
    } else {
        println!("{}", base);
    }
}

/// HRP commands always act on the caller's own entries.
pub fn handle(cmd: &HrpCommand, cfg: &Config, auth: &dyn SessionAuthority) -> AppResult<()> {
    let session = RoleGuard::signed_in().authorize(auth)?;
    let user = session.user_id.as_str();

    let mut pool = open_db(cfg)?;

    match cmd {
        HrpCommand::Log {
            event,
            at,
            comment,
            ip,
        } => {
            let entry = HrpLogic::log_event(
                &mut pool,
                &NewHrpEvent {
                    user_id: user,
                    ip_address: ip.as_deref().unwrap_or(&cfg.default_ip),
                    event_type: *event,
                    timestamp: at.as_deref(),
                    comment: comment.as_deref(),
                },
                Local::now(),
                cfg.hrp_lookahead_minutes,
            )?;
            success(format!(
                "Logged {} at {} (entry #{}).",
                entry.event_type.to_db_str(),
                entry.logged_at.format("%Y-%m-%d %H:%M:%S"),
                entry.id
            ));
        }

        HrpCommand::Correct {
            entry,
            at,
            event,
            comment,
        } => {
            let corrected = HrpLogic::correct_entry(
                &mut pool,
                user,
                *entry,
                at,
                *event,
                comment.as_deref(),
                Local::now(),
                cfg.hrp_lookahead_minutes,
            )?;
            success(format!(
                "Entry #{} superseded by #{} at {}.",
                entry,
                corrected.id,
                corrected.logged_at.format("%Y-%m-%d %H:%M:%S")
            ));
        }

        HrpCommand::Dates { year, month } => {
            let days = HrpLogic::dates_with_entries(&pool, user, *year, *month)?;
            if days.is_empty() {
                info(format!("No entries in {:04}-{:02}.", year, month));
            } else {
                let list: Vec<String> = days.iter().map(|d| d.to_string()).collect();
                println!("{}", list.join(" "));
            }
        }

        HrpCommand::Day {
            year,
            month,
            day,
            details,
        } => {
            let entries = HrpLogic::entries_for_date(&pool, user, *year, *month, *day, *details)?;
            if entries.is_empty() {
                info(format!("No entries on {:04}-{:02}-{:02}.", year, month, day));
            }
            for e in &entries {
                print_entry(e, *details);
            }
        }

        HrpCommand::Export {
            year,
            month,
            format,
            file,
            force,
        } => {
            ExportLogic::export_month(&mut pool, user, *year, *month, *format, file, *force)?;
        }
    }

    Ok(())
}
