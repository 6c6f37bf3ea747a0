use crate::models::hrp_entry::HrpEventLogEntry;
use serde::Serialize;

/// Flat row written by both exporters; CSV headers come from the field names.
#[derive(Serialize, Clone, Debug)]
pub struct HrpEntryExport {
    pub id: i64,
    pub date: String,
    pub time: String,
    pub event_type: String,
    pub entry_type: String,
    pub ip_address: String,
    pub comment: String,
}

impl From<&HrpEventLogEntry> for HrpEntryExport {
    fn from(e: &HrpEventLogEntry) -> Self {
        Self {
            id: e.id,
            date: e.logged_at.format("%Y-%m-%d").to_string(),
            time: e.logged_at.format("%H:%M:%S").to_string(),
            event_type: e.event_type.to_db_str().to_string(),
            entry_type: e.entry_type.to_db_str().to_string(),
            ip_address: e.ip_address.clone().unwrap_or_default(),
            comment: e.comment.clone().unwrap_or_default(),
        }
    }
}
