use super::contract_type::ContractType;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
    pub contract_type: ContractType,
}
