use crate::errors::{AppError, AppResult};
use crate::models::contract_type::ContractType;
use crate::models::user_profile::UserProfile;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_profile(row: &Row) -> Result<UserProfile> {
    let contract_str: String = row.get("contract_type")?;
    let contract_type = ContractType::from_db_str(&contract_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            Box::new(AppError::UnknownContractType(contract_str.clone())),
        )
    })?;

    Ok(UserProfile {
        id: row.get("id")?,
        display_name: row.get("display_name")?,
        contract_type,
    })
}

/// Insert a profile or overwrite name and contract type of an existing one.
pub fn upsert_profile(conn: &Connection, profile: &UserProfile) -> AppResult<()> {
    conn.execute(
        "INSERT INTO user_profiles (id, display_name, contract_type) VALUES (?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET
             display_name = excluded.display_name,
             contract_type = excluded.contract_type",
        params![
            profile.id,
            profile.display_name,
            profile.contract_type.to_db_str()
        ],
    )?;
    Ok(())
}

pub fn find_profile(conn: &Connection, id: &str) -> AppResult<Option<UserProfile>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM user_profiles WHERE id = ?1")?;
    Ok(stmt.query_row([id], map_profile).optional()?)
}

pub fn get_profile(conn: &Connection, id: &str) -> AppResult<UserProfile> {
    find_profile(conn, id)?.ok_or_else(|| AppError::not_found("User profile", id))
}

pub fn load_profiles(conn: &Connection) -> AppResult<Vec<UserProfile>> {
    let mut stmt = conn.prepare("SELECT * FROM user_profiles ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_profile)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
