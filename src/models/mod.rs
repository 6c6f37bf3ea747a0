pub mod contract_type;
pub mod hrp_entry;
pub mod key_assignment;
pub mod key_item;
pub mod protocol;
pub mod user_profile;
