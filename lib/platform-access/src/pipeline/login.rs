//! Login page interception.

use crate::request::RequestContext;
use sso_gate_core::paths;
use tracing::debug;

/// What the login stage concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginCheck {
    /// The request is not an anonymous browser visit to the login page.
    NotApplicable,
    /// The caller asked for the local login form with `direct=1`.
    Bypass,
    /// The visit should end in a federated login redirect.
    Intercept,
}

/// Decides whether an anonymous visit to the login page is intercepted.
#[must_use]
pub fn check(request: &RequestContext, logged_in: bool) -> LoginCheck {
    if request.is_cli() || logged_in || request.path() != paths::LOGIN {
        return LoginCheck::NotApplicable;
    }
    if request.params().is_one("direct") {
        debug!("direct login requested");
        return LoginCheck::Bypass;
    }
    LoginCheck::Intercept
}
