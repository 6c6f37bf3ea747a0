use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Active,
    Returned,
    Lost,
}

impl AssignmentStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Active => "active",
            AssignmentStatus::Returned => "returned",
            AssignmentStatus::Lost => "lost",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(AssignmentStatus::Active),
            "returned" => Some(AssignmentStatus::Returned),
            "lost" => Some(AssignmentStatus::Lost),
            _ => None,
        }
    }
}

/// Links a key item to the profile holding it.
#[derive(Debug, Clone, Serialize)]
pub struct KeyAssignment {
    pub id: i64,
    pub key_item_id: String,
    pub holder_profile_id: String,
    pub issued_at: String,           // ISO8601
    pub returned_at: Option<String>, // set on return only
    pub status: AssignmentStatus,
}

impl KeyAssignment {
    pub fn is_active(&self) -> bool {
        self.status == AssignmentStatus::Active
    }
}
