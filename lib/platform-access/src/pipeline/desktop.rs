//! Desktop sync client compatibility.
//!
//! Desktop clients talk to the data-access endpoints directly. When the
//! operator opts in, an anonymous desktop client is sent through federated
//! login, unless it is new enough to run that flow on its own.

use crate::config::GateSnapshot;
use crate::request::RequestContext;
use regex::Regex;
use semver::Version;
use sso_gate_core::paths;
use std::sync::LazyLock;
use tracing::debug;

/// First desktop client release that negotiates federated login itself.
// TODO: make the threshold and the client pattern configurable per deployment.
pub const MIN_FEDERATED_CLIENT_VERSION: Version = Version::new(2, 5, 0);

/// User agents sent by the desktop sync client.
static DESKTOP_CLIENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:Mozilla/5\.0 \([A-Za-z ]+\) )?(?:mirall|csyncoC)/")
        .expect("desktop client pattern is valid")
});

/// The last `/major.minor.patch` token of a user agent.
static CLIENT_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*/(\d+)\.(\d+)\.(\d+).*$").expect("client version pattern is valid")
});

/// What the desktop stage concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesktopCheck {
    /// Not an anonymous desktop client on a data-access endpoint.
    NotApplicable,
    /// The client must go through federated login.
    Redirect,
    /// The client handles federated login itself.
    Compatible,
}

/// Returns true if the user agent belongs to a desktop sync client.
#[must_use]
pub fn is_desktop_client(user_agent: &str) -> bool {
    DESKTOP_CLIENT.is_match(user_agent)
}

/// Extracts the client version from a user agent.
///
/// Components that do not fit a `u64` make the version unreadable.
#[must_use]
pub fn client_version(user_agent: &str) -> Option<Version> {
    let captures = CLIENT_VERSION.captures(user_agent)?;
    let component = |i: usize| captures.get(i)?.as_str().parse::<u64>().ok();
    Some(Version::new(component(1)?, component(2)?, component(3)?))
}

/// Returns true if the user agent reports a version at or above
/// [`MIN_FEDERATED_CLIENT_VERSION`]. Unreadable versions never qualify.
#[must_use]
pub fn supports_federated_login(user_agent: &str) -> bool {
    client_version(user_agent).is_some_and(|v| v >= MIN_FEDERATED_CLIENT_VERSION)
}

fn is_data_access(path: &str) -> bool {
    path.starts_with(paths::REMOTE_PREFIX) || path.starts_with(paths::OCS_PREFIX)
}

/// Decides whether an anonymous desktop client must be redirected.
#[must_use]
pub fn check(snapshot: &GateSnapshot, request: &RequestContext, logged_in: bool) -> DesktopCheck {
    if !snapshot.auth.desktop_clients_allowed
        || !is_data_access(request.normalized_path(&snapshot.web_root))
    {
        return DesktopCheck::NotApplicable;
    }
    let Some(user_agent) = request.user_agent() else {
        return DesktopCheck::NotApplicable;
    };
    if logged_in || !is_desktop_client(user_agent) {
        return DesktopCheck::NotApplicable;
    }
    if supports_federated_login(user_agent) {
        debug!(user_agent, "desktop client handles federated login");
        return DesktopCheck::Compatible;
    }
    DesktopCheck::Redirect
}
