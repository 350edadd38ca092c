//! Federated-login request gating for sso-gate.
//!
//! This crate decides, for every inbound request, whether it passes through,
//! is sent to the federated login endpoint, is sent to the identity-provider
//! selection page, or is sent to the disabled-account error page. It never
//! authenticates anyone itself.
//!
//! # Pipeline
//!
//! Stages run in order and the first one to settle the request wins:
//! 1. authentication mode (`None` disables the gate entirely)
//! 2. disabled-account blocking
//! 3. login page interception (`direct=1` and command-line invocations opt
//!    out)
//! 4. desktop sync client compatibility on data-access endpoints
//! 5. provider selection when more than one way to log in exists
//! 6. federated login redirect to the default provider
//!
//! Failures never reach the caller: the gate logs them and lets the request
//! through.
//!
//! # Example
//!
//! ```
//! use rootcause::Report;
//! use sso_gate_core::RouteName;
//! use sso_gate_platform_access::{
//!     AuthConfig, AuthMode, Collaborators, CsrfTokenIssuer, Gate, GateError, GateSnapshot,
//!     HeaderAuthOutcome, HeaderAuthenticator, IdentityProvider, Localizer, ProviderRegistry,
//!     RequestContext, UrlGenerator,
//! };
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//!
//! struct Host;
//!
//! impl Localizer for Host {
//!     fn translate(&self, id: &str) -> Result<String, Report<GateError>> {
//!         Ok(id.to_string())
//!     }
//! }
//!
//! impl UrlGenerator for Host {
//!     fn link_to_route_absolute(
//!         &self,
//!         route: RouteName,
//!         _params: &BTreeMap<String, String>,
//!     ) -> Result<String, Report<GateError>> {
//!         Ok(format!("https://cloud.example.com{}", route.path()))
//!     }
//!
//!     fn absolute_url(&self, target: &str) -> Result<String, Report<GateError>> {
//!         Ok(format!("https://cloud.example.com{target}"))
//!     }
//! }
//!
//! impl CsrfTokenIssuer for Host {
//!     fn encrypted_token(&self) -> Result<String, Report<GateError>> {
//!         Ok("token".to_string())
//!     }
//! }
//!
//! impl HeaderAuthenticator for Host {
//!     fn authenticate(
//!         &self,
//!         _request: &RequestContext,
//!     ) -> Result<HeaderAuthOutcome, Report<GateError>> {
//!         Ok(HeaderAuthOutcome::Continue)
//!     }
//! }
//!
//! let host = Arc::new(Host);
//! let collaborators = Collaborators::new(host.clone(), host.clone(), host.clone(), host);
//! let snapshot = GateSnapshot::new(
//!     AuthConfig::new(AuthMode::Federated),
//!     ProviderRegistry::new().with_provider(IdentityProvider::new("1", "Okta")),
//! );
//! let gate = Gate::new(Arc::new(snapshot), collaborators);
//!
//! let evaluation = gate.evaluate(&RequestContext::new("/login", "/login"), None);
//! let redirect = evaluation.decision().redirect().expect("login is intercepted");
//! assert_eq!(redirect.route, RouteName::Login);
//! assert_eq!(redirect.param("idp"), Some("1"));
//! ```

pub mod collaborators;
pub mod config;
pub mod decision;
pub mod error;
pub mod gate;
pub mod pipeline;
pub mod request;
pub mod user;

#[cfg(test)]
mod testing;

// Re-export main types at crate root
pub use collaborators::{
    Collaborators, CsrfTokenIssuer, DISABLED_ACCOUNT_MESSAGE, HeaderAuthOutcome,
    HeaderAuthenticator, Localizer, UrlGenerator,
};
pub use config::{AuthConfig, AuthMode, GateSnapshot, IdentityProvider, ProviderRegistry};
pub use decision::{Evaluation, Redirect, RedirectDecision};
pub use error::GateError;
pub use gate::Gate;
pub use request::{QueryParams, RequestContext};
pub use user::SessionUser;
