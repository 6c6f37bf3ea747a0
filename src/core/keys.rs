//! Key lifecycle: issue, return, loss and reactivation.
//!
//! Per key item: `available → issued → (returned → available | lost)`,
//! and `lost → available` once a key is found again. Every transition
//! writes exactly one protocol row, inside the same `IMMEDIATE`
//! transaction as the state change, so concurrent callers serialize on
//! the write lock and the loser reads the already-updated state.

use crate::db::keys::{
    close_assignment, find_item, find_protocol, get_assignment, get_item, insert_assignment,
    insert_item, insert_protocol, load_assignments, load_items, load_protocol, set_item_status,
};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::profiles::{find_profile, get_profile};
use crate::errors::{AppError, AppResult};
use crate::models::key_assignment::{AssignmentStatus, KeyAssignment};
use crate::models::key_item::{KeyItem, KeyStatus};
use crate::models::protocol::{KeyProtocolEntry, ProtocolAction, ProtocolDetails};

fn require_non_empty(value: &str, what: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{what} must not be empty")));
    }
    Ok(())
}

pub struct KeyLogic;

impl KeyLogic {
    /// Register a new key item in state `available`.
    pub fn register_item(pool: &mut DbPool, id: &str, label: &str) -> AppResult<KeyItem> {
        require_non_empty(id, "Key item id")?;

        pool.with_write_tx(|tx| {
            if find_item(tx, id)?.is_some() {
                return Err(AppError::AlreadyExists {
                    entity: "Key item",
                    id: id.to_string(),
                });
            }
            let item = insert_item(tx, id, label)?;
            ttlog(tx, "key_add", id, &format!("Registered key '{}'", label))?;
            Ok(item)
        })
    }

    /// Issue every listed key to one holder.
    ///
    /// All-or-nothing: if any key is unknown or not `available`, nothing
    /// is written. Returns the protocol ids in the order of `key_item_ids`.
    pub fn issue(
        pool: &mut DbPool,
        holder_profile_id: &str,
        key_item_ids: &[String],
        acting_user_id: Option<&str>,
    ) -> AppResult<Vec<i64>> {
        require_non_empty(holder_profile_id, "Holder profile id")?;
        if key_item_ids.is_empty() {
            return Err(AppError::InvalidInput("No key items given".into()));
        }

        pool.with_write_tx(|tx| {
            get_profile(tx, holder_profile_id)?;

            let mut protocol_ids = Vec::with_capacity(key_item_ids.len());
            for key_id in key_item_ids {
                let item = get_item(tx, key_id)?;
                if !item.is_available() {
                    return Err(AppError::ItemNotAvailable(item.id));
                }

                let assignment_id = insert_assignment(tx, &item.id, holder_profile_id)?;
                set_item_status(tx, &item.id, KeyStatus::Issued)?;
                protocol_ids.push(insert_protocol(
                    tx,
                    ProtocolAction::Issue,
                    &item.id,
                    Some(assignment_id),
                    acting_user_id,
                )?);
            }

            ttlog(
                tx,
                "key_issue",
                holder_profile_id,
                &format!("Issued {}", key_item_ids.join(", ")),
            )?;
            Ok(protocol_ids)
        })
    }

    /// Take keys back. Every assignment must still be `active`.
    pub fn return_keys(
        pool: &mut DbPool,
        assignment_ids: &[i64],
        acting_user_id: Option<&str>,
    ) -> AppResult<Vec<i64>> {
        if assignment_ids.is_empty() {
            return Err(AppError::InvalidInput("No assignments given".into()));
        }

        pool.with_write_tx(|tx| {
            let mut protocol_ids = Vec::with_capacity(assignment_ids.len());
            let mut returned = Vec::with_capacity(assignment_ids.len());
            for &id in assignment_ids {
                let assignment = get_assignment(tx, id)?;
                if !assignment.is_active() {
                    return Err(AppError::AssignmentNotActive(id));
                }

                close_assignment(tx, id, AssignmentStatus::Returned)?;
                set_item_status(tx, &assignment.key_item_id, KeyStatus::Available)?;
                protocol_ids.push(insert_protocol(
                    tx,
                    ProtocolAction::Return,
                    &assignment.key_item_id,
                    Some(id),
                    acting_user_id,
                )?);
                returned.push(format!(
                    "{} from {}",
                    assignment.key_item_id, assignment.holder_profile_id
                ));
            }

            // one log row per call
            ttlog(
                tx,
                "key_return",
                &assignment_ids
                    .iter()
                    .map(|id| format!("#{id}"))
                    .collect::<Vec<_>>()
                    .join(", "),
                &format!("Returned {}", returned.join(", ")),
            )?;
            Ok(protocol_ids)
        })
    }

    /// Close an active assignment as lost; the key itself becomes `lost`.
    pub fn mark_lost(
        pool: &mut DbPool,
        assignment_id: i64,
        acting_user_id: Option<&str>,
    ) -> AppResult<KeyAssignment> {
        pool.with_write_tx(|tx| {
            let assignment = get_assignment(tx, assignment_id)?;
            if !assignment.is_active() {
                return Err(AppError::AssignmentNotActive(assignment_id));
            }

            close_assignment(tx, assignment_id, AssignmentStatus::Lost)?;
            set_item_status(tx, &assignment.key_item_id, KeyStatus::Lost)?;
            insert_protocol(
                tx,
                ProtocolAction::Lost,
                &assignment.key_item_id,
                Some(assignment_id),
                acting_user_id,
            )?;

            ttlog(
                tx,
                "key_lost",
                &assignment.key_item_id,
                &format!("Lost by {}", assignment.holder_profile_id),
            )?;
            get_assignment(tx, assignment_id)
        })
    }

    /// Put a found key back into circulation.
    pub fn reactivate(
        pool: &mut DbPool,
        key_item_id: &str,
        acting_user_id: Option<&str>,
    ) -> AppResult<KeyItem> {
        pool.with_write_tx(|tx| {
            let item = get_item(tx, key_item_id)?;
            if item.status != KeyStatus::Lost {
                return Err(AppError::ItemNotLost(item.id));
            }

            set_item_status(tx, &item.id, KeyStatus::Available)?;
            insert_protocol(tx, ProtocolAction::Reactivate, &item.id, None, acting_user_id)?;

            ttlog(tx, "key_reactivate", &item.id, "Found and reactivated")?;
            get_item(tx, key_item_id)
        })
    }

    /// A protocol row with the key, assignment and holder it refers to.
    pub fn protocol_details(pool: &DbPool, protocol_id: i64) -> AppResult<ProtocolDetails> {
        let protocol = find_protocol(&pool.conn, protocol_id)?
            .ok_or_else(|| AppError::not_found("Protocol", protocol_id))?;

        let key_item = get_item(&pool.conn, &protocol.key_item_id)?;
        let assignment = match protocol.assignment_id {
            Some(id) => Some(get_assignment(&pool.conn, id)?),
            None => None,
        };
        let holder = match &assignment {
            Some(a) => find_profile(&pool.conn, &a.holder_profile_id)?,
            None => None,
        };

        Ok(ProtocolDetails {
            protocol,
            key_item,
            assignment,
            holder,
        })
    }

    pub fn items(pool: &DbPool) -> AppResult<Vec<KeyItem>> {
        load_items(&pool.conn)
    }

    pub fn assignments(
        pool: &DbPool,
        holder: Option<&str>,
        active_only: bool,
    ) -> AppResult<Vec<KeyAssignment>> {
        load_assignments(&pool.conn, holder, active_only)
    }

    pub fn history(pool: &DbPool, key_item_id: Option<&str>) -> AppResult<Vec<KeyProtocolEntry>> {
        load_protocol(&pool.conn, key_item_id)
    }
}
