//! Gate decisions.
//!
//! A decision is the only output of the pipeline. The host translates it
//! into a response: pass-through continues normal dispatch, a redirect is
//! answered with `302 Found`, and terminate stops processing without
//! touching the response any further.

use crate::error::GateError;
use rootcause::Report;
use serde::Serialize;
use sso_gate_core::RouteName;
use std::collections::BTreeMap;

/// A redirect to a named route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    /// The target route.
    pub route: RouteName,
    /// Parameters the route is generated with.
    pub params: BTreeMap<String, String>,
    /// Absolute URL for the `Location` header.
    pub location: String,
}

impl Redirect {
    /// Returns a route parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// The verdict for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RedirectDecision {
    /// Let the request through untouched.
    PassThrough,
    /// Answer with a redirect and stop processing.
    RedirectTo(Redirect),
    /// Stop processing; a collaborator has already produced the response.
    Terminate,
}

impl RedirectDecision {
    /// Returns true for pass-through.
    #[must_use]
    pub fn is_pass_through(&self) -> bool {
        matches!(self, Self::PassThrough)
    }

    /// Returns the redirect, if this decision is one.
    #[must_use]
    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            Self::RedirectTo(redirect) => Some(redirect),
            Self::PassThrough | Self::Terminate => None,
        }
    }
}

/// Result of running the gate for one request.
///
/// A failed evaluation is never surfaced as an error: the decision falls
/// back to pass-through and the failure is carried alongside it (it has
/// already been logged by the time the host sees it).
#[derive(Debug)]
pub struct Evaluation {
    decision: RedirectDecision,
    error: Option<Report<GateError>>,
}

impl Evaluation {
    /// An evaluation that completed normally.
    #[must_use]
    pub fn decided(decision: RedirectDecision) -> Self {
        Self {
            decision,
            error: None,
        }
    }

    /// An evaluation abandoned because of the given failure.
    #[must_use]
    pub fn failed_open(error: Report<GateError>) -> Self {
        Self {
            decision: RedirectDecision::PassThrough,
            error: Some(error),
        }
    }

    /// Returns the decision.
    #[must_use]
    pub fn decision(&self) -> &RedirectDecision {
        &self.decision
    }

    /// Returns the failure that forced a pass-through, if any.
    #[must_use]
    pub fn error(&self) -> Option<&Report<GateError>> {
        self.error.as_ref()
    }

    /// Returns true if the evaluation was abandoned.
    #[must_use]
    pub fn is_fail_open(&self) -> bool {
        self.error.is_some()
    }

    /// Consumes the evaluation, returning the decision.
    #[must_use]
    pub fn into_decision(self) -> RedirectDecision {
        self.decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_redirect() -> Redirect {
        Redirect {
            route: RouteName::Login,
            params: BTreeMap::from([("idp".to_string(), "1".to_string())]),
            location: "https://cloud.example.com/apps/user_saml/saml/login?idp=1".to_string(),
        }
    }

    #[test]
    fn redirect_accessors() {
        let decision = RedirectDecision::RedirectTo(login_redirect());
        assert!(!decision.is_pass_through());
        let redirect = decision.redirect().expect("redirect");
        assert_eq!(redirect.param("idp"), Some("1"));
        assert_eq!(redirect.param("missing"), None);
    }

    #[test]
    fn failed_open_passes_through() {
        let evaluation = Evaluation::failed_open(
            GateError::TokenIssuance {
                reason: "boom".to_string(),
            }
            .into(),
        );
        assert!(evaluation.is_fail_open());
        assert!(evaluation.decision().is_pass_through());
    }

    #[test]
    fn decision_serializes_with_kind_tag() {
        let json = serde_json::to_value(RedirectDecision::PassThrough).expect("serialize");
        assert_eq!(json["kind"], "pass_through");

        let json =
            serde_json::to_value(RedirectDecision::RedirectTo(login_redirect())).expect("serialize");
        assert_eq!(json["kind"], "redirect_to");
        assert_eq!(json["route"], "user_saml.SAML.login");
    }
}
