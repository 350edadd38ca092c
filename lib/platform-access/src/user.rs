//! The authenticated user as seen by the gate.
//!
//! The account backend owns users; the gate only needs to know who is
//! logged in (for logs) and whether the account is enabled.

use serde::{Deserialize, Serialize};

/// The user attached to the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// The user's login name.
    uid: String,
    /// Whether the account is enabled.
    enabled: bool,
}

impl SessionUser {
    /// Creates an enabled user.
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            enabled: true,
        }
    }

    /// Creates a disabled user.
    #[must_use]
    pub fn disabled(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            enabled: false,
        }
    }

    /// Returns the user's login name.
    #[must_use]
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Returns true if the account is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
