//! Authentication mode selection.

use crate::collaborators::{HeaderAuthOutcome, HeaderAuthenticator};
use crate::config::{AuthConfig, AuthMode};
use crate::decision::RedirectDecision;
use crate::error::GateError;
use crate::pipeline::Step;
use crate::request::RequestContext;
use rootcause::Report;
use sso_gate_core::paths;
use tracing::debug;

/// Applies the configured authentication mode.
///
/// With no federated login configured every request passes. In
/// header-derived mode the host's header authentication runs first, except
/// for the OAuth2 token endpoint, which goes on to the later stages without
/// it.
pub fn select(
    auth: &AuthConfig,
    request: &RequestContext,
    header_auth: &dyn HeaderAuthenticator,
) -> Result<Step, Report<GateError>> {
    match auth.mode {
        AuthMode::None => {
            debug!("federated login not configured");
            Ok(Step::Decide(RedirectDecision::PassThrough))
        }
        AuthMode::HeaderDerived => {
            if request.full_uri().ends_with(paths::OAUTH2_TOKEN_SUFFIX) {
                debug!("oauth2 token endpoint exempt from header authentication");
                return Ok(Step::Continue);
            }
            match header_auth.authenticate(request)? {
                HeaderAuthOutcome::Continue => Ok(Step::Continue),
                HeaderAuthOutcome::Responded => {
                    debug!("header authentication answered the request");
                    Ok(Step::Decide(RedirectDecision::Terminate))
                }
            }
        }
        AuthMode::Federated => Ok(Step::Continue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingAuth {
        calls: AtomicUsize,
        outcome: HeaderAuthOutcome,
    }

    impl CountingAuth {
        fn new(outcome: HeaderAuthOutcome) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                outcome,
            }
        }
    }

    impl HeaderAuthenticator for CountingAuth {
        fn authenticate(
            &self,
            _request: &RequestContext,
        ) -> Result<HeaderAuthOutcome, Report<GateError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.outcome)
        }
    }

    #[test]
    fn none_mode_passes_through() {
        let auth = CountingAuth::new(HeaderAuthOutcome::Continue);
        let request = RequestContext::new("/login", "/login");

        let step = select(&AuthConfig::new(AuthMode::None), &request, &auth).expect("step");

        assert_eq!(step, Step::Decide(RedirectDecision::PassThrough));
        assert_eq!(auth.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn federated_mode_continues_without_header_auth() {
        let auth = CountingAuth::new(HeaderAuthOutcome::Continue);
        let request = RequestContext::new("/login", "/login");

        let step = select(&AuthConfig::new(AuthMode::Federated), &request, &auth).expect("step");

        assert_eq!(step, Step::Continue);
        assert_eq!(auth.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn header_mode_triggers_authentication() {
        let auth = CountingAuth::new(HeaderAuthOutcome::Continue);
        let request = RequestContext::new("/apps/files", "/apps/files");

        let step =
            select(&AuthConfig::new(AuthMode::HeaderDerived), &request, &auth).expect("step");

        assert_eq!(step, Step::Continue);
        assert_eq!(auth.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn header_mode_skips_oauth2_token_endpoint() {
        let auth = CountingAuth::new(HeaderAuthOutcome::Continue);
        let request = RequestContext::new(
            "/apps/oauth2/api/v1/token",
            "/cloud/index.php/apps/oauth2/api/v1/token",
        );

        let step =
            select(&AuthConfig::new(AuthMode::HeaderDerived), &request, &auth).expect("step");

        assert_eq!(step, Step::Continue);
        assert_eq!(auth.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn header_mode_terminates_when_authenticator_responded() {
        let auth = CountingAuth::new(HeaderAuthOutcome::Responded);
        let request = RequestContext::new("/apps/files", "/apps/files");

        let step =
            select(&AuthConfig::new(AuthMode::HeaderDerived), &request, &auth).expect("step");

        assert_eq!(step, Step::Decide(RedirectDecision::Terminate));
    }
}
