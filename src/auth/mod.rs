//! Session resolution and role checks.
//!
//! Identity is owned by an external provider; the core only sees the
//! resolved [`Session`] through a [`SessionAuthority`].

pub mod guard;
pub mod session;

pub use guard::RoleGuard;
pub use session::{Session, SessionAuthority, StaticSessionAuthority};
