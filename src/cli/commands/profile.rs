use super::open_db;
use crate::auth::{RoleGuard, SessionAuthority};
use crate::cli::parser::ProfileCommand;
use crate::config::Config;
use crate::core::profiles::ProfileLogic;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &ProfileCommand, cfg: &Config, auth: &dyn SessionAuthority) -> AppResult<()> {
    RoleGuard::require(&cfg.key_manager_role).authorize(auth)?;

    let mut pool = open_db(cfg)?;

    match cmd {
        ProfileCommand::Add { id, name, contract } => {
            let p = ProfileLogic::register(&mut pool, id, name, contract)?;
            success(format!(
                "Profile {} saved ({}).",
                p.id,
                p.contract_type.to_db_str()
            ));
        }
        ProfileCommand::List => {
            let profiles = ProfileLogic::list(&pool)?;
            if profiles.is_empty() {
                info("No profiles registered.");
            }
            for p in profiles {
                println!(
                    "{:<12} {:<14} {}",
                    p.id,
                    p.contract_type.to_db_str(),
                    p.display_name
                );
            }
        }
    }

    Ok(())
}
