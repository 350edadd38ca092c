//! Named routes and well-known request paths.
//!
//! Gate decisions never carry literal URLs for their targets; they name one
//! of the routes below and let the host's URL generator turn the route and
//! its parameters into an absolute `Location`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Well-known request paths the gate matches against.
pub mod paths {
    /// The application's own login page.
    pub const LOGIN: &str = "/login";

    /// Path of the dedicated disabled-account error page.
    ///
    /// A disabled user requesting this path is let through so the error page
    /// itself never redirects to itself.
    pub const ERROR: &str = "/apps/user_saml/saml/error";

    /// Path of the federated login endpoint.
    pub const FEDERATED_LOGIN: &str = "/apps/user_saml/saml/login";

    /// Path of the identity-provider selection page.
    pub const SELECT_BACKEND: &str = "/apps/user_saml/saml/selectUserBackEnd";

    /// OAuth2 token endpoint suffix exempt from header-derived authentication.
    ///
    /// OAuth2 clients may send their credentials as basic auth to this
    /// endpoint, which a header-derived authenticator would reject.
    pub const OAUTH2_TOKEN_SUFFIX: &str = "/apps/oauth2/api/v1/token";

    /// Remote file access (WebDAV) prefix.
    pub const REMOTE_PREFIX: &str = "/remote.php/";

    /// OCS API prefix.
    pub const OCS_PREFIX: &str = "/ocs/";
}

/// A named redirect target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteName {
    /// Federated login endpoint.
    #[serde(rename = "user_saml.SAML.login")]
    Login,
    /// Identity-provider selection page.
    #[serde(rename = "user_saml.SAML.selectUserBackEnd")]
    SelectUserBackEnd,
    /// Generic error page, used for disabled accounts.
    #[serde(rename = "user_saml.SAML.genericError")]
    GenericError,
}

impl RouteName {
    /// Returns the route's stable identifier.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "user_saml.SAML.login",
            Self::SelectUserBackEnd => "user_saml.SAML.selectUserBackEnd",
            Self::GenericError => "user_saml.SAML.genericError",
        }
    }

    /// Returns the request path the route is served under.
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => paths::FEDERATED_LOGIN,
            Self::SelectUserBackEnd => paths::SELECT_BACKEND,
            Self::GenericError => paths::ERROR,
        }
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
