//! HRP (work-time logging): timestamp validation, the edit policy, and the
//! operations that append to or read from the event log.

pub mod entries;
pub mod policy;
pub mod validate;

pub use entries::HrpLogic;
pub use policy::can_modify;
pub use validate::{validate_timestamp, validate_timestamp_at};
