pub mod hrp;
pub mod initialize;
pub mod keys;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod profiles;
pub mod stats;
