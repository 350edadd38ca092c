//! Host services the gate calls into.
//!
//! The gate never builds URLs, translates text, or mints tokens itself. The
//! host hands it implementations of these traits once at boot. Every call
//! may fail; a failure abandons the evaluation (see [`crate::Gate`]).

use crate::error::GateError;
use crate::request::RequestContext;
use rootcause::Report;
use sso_gate_core::RouteName;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Message shown to users whose account has been disabled.
pub const DISABLED_ACCOUNT_MESSAGE: &str =
    "This user account is disabled, please contact your administrator.";

/// Translates user-facing messages.
pub trait Localizer: Send + Sync {
    /// Returns the display string for a message id (the English source text).
    fn translate(&self, message_id: &str) -> Result<String, Report<GateError>>;
}

/// Builds absolute URLs.
pub trait UrlGenerator: Send + Sync {
    /// Returns the absolute URL of a named route with the given parameters.
    fn link_to_route_absolute(
        &self,
        route: RouteName,
        params: &BTreeMap<String, String>,
    ) -> Result<String, Report<GateError>>;

    /// Resolves a host-relative target (e.g. `/apps/files`) to an absolute URL.
    fn absolute_url(&self, target: &str) -> Result<String, Report<GateError>>;
}

/// Issues anti-forgery tokens for the federated login form.
pub trait CsrfTokenIssuer: Send + Sync {
    /// Returns a fresh token in its encrypted, transport-safe form.
    fn encrypted_token(&self) -> Result<String, Report<GateError>>;
}

/// What the header-derived authentication trigger did with the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAuthOutcome {
    /// The trigger ran; gating continues.
    Continue,
    /// The trigger already answered the request (e.g. with a challenge).
    Responded,
}

/// Runs the host's header-based authentication mechanism.
pub trait HeaderAuthenticator: Send + Sync {
    /// Authenticates the request from its trusted headers.
    fn authenticate(&self, request: &RequestContext)
    -> Result<HeaderAuthOutcome, Report<GateError>>;
}

/// The set of host services a gate is built with.
#[derive(Clone)]
pub struct Collaborators {
    pub(crate) localizer: Arc<dyn Localizer>,
    pub(crate) urls: Arc<dyn UrlGenerator>,
    pub(crate) tokens: Arc<dyn CsrfTokenIssuer>,
    pub(crate) header_auth: Arc<dyn HeaderAuthenticator>,
}

impl Collaborators {
    /// Bundles the host services.
    #[must_use]
    pub fn new(
        localizer: Arc<dyn Localizer>,
        urls: Arc<dyn UrlGenerator>,
        tokens: Arc<dyn CsrfTokenIssuer>,
        header_auth: Arc<dyn HeaderAuthenticator>,
    ) -> Self {
        Self {
            localizer,
            urls,
            tokens,
            header_auth,
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
