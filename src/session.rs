// Session state: the id of the user who last logged in successfully.
// The shell owns one `Session` and hands it to the handlers that need it;
// there is no logout, a later login simply replaces the id.

use crate::error::{CritterError, Result};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: Option<i64>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful login, replacing any previous user.
    pub fn login(&mut self, user_id: i64) {
        self.user_id = Some(user_id);
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// Returns the current user id, or `AuthRequired` when nobody is logged in.
    pub fn require_user(&self) -> Result<i64> {
        self.user_id.ok_or(CritterError::AuthRequired)
    }
}
