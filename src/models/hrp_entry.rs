use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// How an HRP row came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Live,       // clocked at the moment of the event
    Manual,     // backdated by the user
    Correction, // supersedes an earlier row
}

impl EntryType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EntryType::Live => "live",
            EntryType::Manual => "manual",
            EntryType::Correction => "correction",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "live" => Some(EntryType::Live),
            "manual" => Some(EntryType::Manual),
            "correction" => Some(EntryType::Correction),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum HrpEventType {
    Start,
    End,
    BreakStart,
    BreakEnd,
}

impl HrpEventType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            HrpEventType::Start => "start",
            HrpEventType::End => "end",
            HrpEventType::BreakStart => "break_start",
            HrpEventType::BreakEnd => "break_end",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "start" => Some(HrpEventType::Start),
            "end" => Some(HrpEventType::End),
            "break_start" => Some(HrpEventType::BreakStart),
            "break_end" => Some(HrpEventType::BreakEnd),
            _ => None,
        }
    }
}

/// One logged clock event. Rows are never updated.
#[derive(Debug, Clone, Serialize)]
pub struct HrpEventLogEntry {
    pub id: i64,
    pub user_id: String,
    pub ip_address: Option<String>,
    pub entry_type: EntryType,
    pub event_type: HrpEventType,
    pub logged_at: NaiveDateTime, // ⇔ hrp_event_log.logged_date + logged_time (local)
    pub comment: Option<String>,
    pub created_at: String,
}

impl HrpEventLogEntry {
    pub fn date(&self) -> NaiveDate {
        self.logged_at.date()
    }

    /// Drop the fields only shown in detail views.
    pub fn without_details(mut self) -> Self {
        self.ip_address = None;
        self.comment = None;
        self
    }
}
