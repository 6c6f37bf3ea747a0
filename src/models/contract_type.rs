use crate::errors::{AppError, AppResult};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    FixedSalary,
    Hourly,
}

impl ContractType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ContractType::FixedSalary => "fixed_salary",
            ContractType::Hourly => "hourly",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "fixed_salary" => Some(ContractType::FixedSalary),
            "hourly" => Some(ContractType::Hourly),
            _ => None,
        }
    }

    /// Parse user input, rejecting anything but the two known contract kinds.
    pub fn parse(s: &str) -> AppResult<Self> {
        Self::from_db_str(s).ok_or_else(|| AppError::UnknownContractType(s.to_string()))
    }
}
