use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::profiles::{load_profiles, upsert_profile};
use crate::errors::{AppError, AppResult};
use crate::models::contract_type::ContractType;
use crate::models::user_profile::UserProfile;

pub struct ProfileLogic;

impl ProfileLogic {
    /// Create a profile, or update name and contract of an existing one.
    pub fn register(
        pool: &mut DbPool,
        id: &str,
        display_name: &str,
        contract_type: &str,
    ) -> AppResult<UserProfile> {
        if id.trim().is_empty() {
            return Err(AppError::InvalidInput("Profile id must not be empty".into()));
        }

        let profile = UserProfile {
            id: id.to_string(),
            display_name: display_name.to_string(),
            contract_type: ContractType::parse(contract_type)?,
        };

        pool.with_write_tx(|tx| {
            upsert_profile(tx, &profile)?;
            ttlog(
                tx,
                "profile",
                id,
                &format!("Contract type set to {}", profile.contract_type.to_db_str()),
            )
        })?;

        Ok(profile)
    }

    pub fn list(pool: &DbPool) -> AppResult<Vec<UserProfile>> {
        load_profiles(&pool.conn)
    }
}
