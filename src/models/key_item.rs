use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStatus {
    Available,
    Issued,
    Lost,
}

impl KeyStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            KeyStatus::Available => "available",
            KeyStatus::Issued => "issued",
            KeyStatus::Lost => "lost",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "available" => Some(KeyStatus::Available),
            "issued" => Some(KeyStatus::Issued),
            "lost" => Some(KeyStatus::Lost),
            _ => None,
        }
    }
}

/// A physical key.
#[derive(Debug, Clone, Serialize)]
pub struct KeyItem {
    pub id: String,     // ⇔ key_items.id (TEXT, e.g. "K1")
    pub label: String,  // ⇔ key_items.label
    pub status: KeyStatus,
    pub created_at: String,
}

impl KeyItem {
    pub fn is_available(&self) -> bool {
        self.status == KeyStatus::Available
    }
}
