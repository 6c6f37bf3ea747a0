use super::session::{Session, SessionAuthority};
use crate::errors::{AppError, AppResult};

/// Capability check run before any operation touches the database.
///
/// A guard without a role only demands that someone is signed in.
#[derive(Debug, Clone)]
pub struct RoleGuard {
    required: Option<String>,
}

impl RoleGuard {
    pub fn require(role: impl Into<String>) -> Self {
        Self {
            required: Some(role.into()),
        }
    }

    pub fn signed_in() -> Self {
        Self { required: None }
    }

    /// Check an already resolved session.
    pub fn check(&self, session: Option<Session>) -> AppResult<Session> {
        let session = session.ok_or(AppError::Unauthenticated)?;

        match &self.required {
            Some(role) if !session.has_role(role) => Err(AppError::Forbidden(role.clone())),
            _ => Ok(session),
        }
    }

    pub fn authorize(&self, authority: &dyn SessionAuthority) -> AppResult<Session> {
        self.check(authority.current_session()?)
    }
}
