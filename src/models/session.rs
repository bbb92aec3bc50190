use serde::Serialize;

use super::user::User;

/// Snapshot of the client's view of the current session.
///
/// Only the auth controller produces new values; everyone else receives
/// clones of the latest snapshot.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<User>,
    pub is_loading: bool,
    pub is_authenticated: bool,
}

/// The three phases a consumer needs to distinguish.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Probing,
    Authenticated,
    Unauthenticated,
}

impl SessionState {
    /// The state a controller starts in, before its first probe resolves.
    pub fn probing() -> Self {
        SessionState {
            user: None,
            is_loading: true,
            is_authenticated: false,
        }
    }

    pub fn authenticated(user: User) -> Self {
        SessionState {
            user: Some(user),
            is_loading: false,
            is_authenticated: true,
        }
    }

    pub fn unauthenticated() -> Self {
        SessionState {
            user: None,
            is_loading: false,
            is_authenticated: false,
        }
    }

    /// Any in-flight probe reads as `Probing`, whatever the last known values are.
    pub fn phase(&self) -> SessionPhase {
        if self.is_loading {
            SessionPhase::Probing
        } else if self.is_authenticated && self.user.is_some() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Unauthenticated
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::probing()
    }
}
