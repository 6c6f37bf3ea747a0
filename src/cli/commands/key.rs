use super::open_db;
use crate::auth::{RoleGuard, SessionAuthority};
use crate::cli::parser::KeyCommand;
use crate::config::Config;
use crate::core::keys::KeyLogic;
use crate::errors::{AppError, AppResult};
use crate::models::protocol::ProtocolDetails;
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREEN, GREY, RED, RESET, YELLOW};

fn status_color(status: &str) -> &'static str {
    match status {
        "available" | "returned" => GREEN,
        "issued" | "active" => YELLOW,
        "lost" => RED,
        _ => RESET,
    }
}

fn print_details(d: &ProtocolDetails) {
    println!(
        "Protocol #{} [{}] at {}",
        d.protocol.id,
        d.protocol.action.to_db_str(),
        d.protocol.created_at
    );
    println!(
        "  acting user : {}",
        d.protocol.acting_user_id.as_deref().unwrap_or("--")
    );
    println!(
        "  key         : {} {} ({})",
        d.key_item.id,
        d.key_item.label,
        d.key_item.status.to_db_str()
    );
    match &d.assignment {
        Some(a) => println!(
            "  assignment  : #{} {} issued {} returned {}",
            a.id,
            a.status.to_db_str(),
            a.issued_at,
            a.returned_at.as_deref().unwrap_or("--")
        ),
        None => println!("  assignment  : {GREY}--{RESET}"),
    }
    if let Some(h) = &d.holder {
        println!(
            "  holder      : {} {} ({})",
            h.id,
            h.display_name,
            h.contract_type.to_db_str()
        );
    }
}

pub fn handle(cmd: &KeyCommand, cfg: &Config, auth: &dyn SessionAuthority) -> AppResult<()> {
    // every key operation, read or write, is reserved to key managers
    let session = RoleGuard::require(&cfg.key_manager_role).authorize(auth)?;
    let acting = Some(session.user_id.as_str());

    let mut pool = open_db(cfg)?;

    match cmd {
        KeyCommand::Add { id, label } => {
            let item = KeyLogic::register_item(&mut pool, id, label)?;
            success(format!("Key {} registered.", item.id));
        }

        KeyCommand::List => {
            let items = KeyLogic::items(&pool)?;
            if items.is_empty() {
                info("No keys registered.");
            }
            for k in items {
                let status = k.status.to_db_str();
                println!(
                    "{:<10} {}{:<10}{} {}",
                    k.id,
                    status_color(status),
                    status,
                    RESET,
                    k.label
                );
            }
        }

        KeyCommand::Assignments { holder, active } => {
            for a in KeyLogic::assignments(&pool, holder.as_deref(), *active)? {
                let status = a.status.to_db_str();
                println!(
                    "#{:<5} {:<10} {:<10} {}{:<9}{} {}",
                    a.id,
                    a.key_item_id,
                    a.holder_profile_id,
                    status_color(status),
                    status,
                    RESET,
                    a.issued_at
                );
            }
        }

        KeyCommand::History { item } => {
            for p in KeyLogic::history(&pool, item.as_deref())? {
                println!(
                    "#{:<5} {:<11} {:<10} {:<6} {:<10} {}",
                    p.id,
                    p.action.to_db_str(),
                    p.key_item_id,
                    p.assignment_id
                        .map(|a| a.to_string())
                        .unwrap_or_else(|| "--".into()),
                    p.acting_user_id.as_deref().unwrap_or("--"),
                    p.created_at
                );
            }
        }

        KeyCommand::Issue { profile, keys } => {
            let ids = KeyLogic::issue(&mut pool, profile, keys, acting)?;
            success(format!("Issued {} key(s) to {}.", keys.len(), profile));
            println!("protocol ids: {}", join_ids(&ids));
        }

        KeyCommand::Return { assignments } => {
            let ids = KeyLogic::return_keys(&mut pool, assignments, acting)?;
            success(format!("Returned {} key(s).", assignments.len()));
            println!("protocol ids: {}", join_ids(&ids));
        }

        KeyCommand::Lost { assignment } => {
            let a = KeyLogic::mark_lost(&mut pool, *assignment, acting)?;
            success(format!(
                "Assignment #{} marked lost; key {} is now lost.",
                a.id, a.key_item_id
            ));
        }

        KeyCommand::Reactivate { item } => {
            let k = KeyLogic::reactivate(&mut pool, item, acting)?;
            success(format!("Key {} is {} again.", k.id, k.status.to_db_str()));
        }

        KeyCommand::Protocol { id, json } => {
            let details = KeyLogic::protocol_details(&pool, *id)?;
            if *json {
                let out = serde_json::to_string_pretty(&details)
                    .map_err(|e| AppError::Export(e.to_string()))?;
                println!("{out}");
            } else {
                print_details(&details);
            }
        }
    }

    Ok(())
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
