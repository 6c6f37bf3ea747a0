pub mod hrp;
pub mod keys;
pub mod log;
pub mod profiles;
