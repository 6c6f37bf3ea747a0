use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::{init_db, missing_guards};
use crate::db::migrate::{applied_versions, run_pending_migrations};
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};

fn step(label: &str) {
    println!("{}▶ {}…{}", CYAN, label, RESET);
}

fn done(label: &str) {
    println!("{}✔ {}{}\n", GREEN, label, RESET);
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
    } = cmd
    else {
        return Ok(());
    };

    let mut pool = DbPool::new(&cfg.database)?;

    if *migrate {
        step("Running migrations");
        run_pending_migrations(&pool.conn)?;
        for v in applied_versions(&pool.conn)? {
            println!("  • {}", v);
        }
        done("Migration completed.");
    }

    if *info {
        init_db(&pool.conn)?;
        stats::print_db_info(&mut pool, &cfg.database)?;
    }

    if *check {
        step("Running integrity check");
        let integrity: String = pool
            .conn
            .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

        let missing = missing_guards(&pool.conn)?;

        if integrity == "ok" && missing.is_empty() {
            done("Integrity check passed.");
        } else {
            if integrity != "ok" {
                println!("{}✘ Integrity check failed:{} {}", RED, RESET, integrity);
            }
            for name in missing {
                println!("{}✘ Missing schema guard:{} {}", RED, RESET, name);
            }
            println!();
        }
    }

    if *vacuum {
        step("Running VACUUM");
        pool.conn.execute_batch("VACUUM;")?;
        done("Vacuum completed.");
    }

    Ok(())
}
