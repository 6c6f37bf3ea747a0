use crate::errors::AppResult;
use std::collections::BTreeSet;

/// The caller as resolved by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub roles: BTreeSet<String>,
}

impl Session {
    pub fn new<I, S>(user_id: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            user_id: user_id.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// Source of the current caller's session.
pub trait SessionAuthority {
    /// `Ok(None)` means nobody is signed in.
    fn current_session(&self) -> AppResult<Option<Session>>;
}

/// Authority answering with a fixed session, built once at startup
/// (from command-line flags for the CLI, by hand in tests).
#[derive(Debug, Clone, Default)]
pub struct StaticSessionAuthority {
    session: Option<Session>,
}

impl StaticSessionAuthority {
    pub fn new(session: Option<Session>) -> Self {
        Self { session }
    }

    pub fn signed_in<I, S>(user_id: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Some(Session::new(user_id, roles)))
    }

    pub fn anonymous() -> Self {
        Self::new(None)
    }
}

impl SessionAuthority for StaticSessionAuthority {
    fn current_session(&self) -> AppResult<Option<Session>> {
        Ok(self.session.clone())
    }
}
