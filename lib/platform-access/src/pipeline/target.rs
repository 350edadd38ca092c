//! Federated login redirect.

use crate::collaborators::{CsrfTokenIssuer, UrlGenerator};
use crate::config::ProviderRegistry;
use crate::decision::{Redirect, RedirectDecision};
use crate::error::GateError;
use crate::request::RequestContext;
use rootcause::Report;
use sso_gate_core::RouteName;
use std::collections::BTreeMap;
use tracing::debug;

/// Builds the redirect to the federated login endpoint of the default
/// provider.
///
/// An empty registry produces an empty `idp` rather than an error.
pub fn build(
    registry: &ProviderRegistry,
    request: &RequestContext,
    urls: &dyn UrlGenerator,
    tokens: &dyn CsrfTokenIssuer,
) -> Result<RedirectDecision, Report<GateError>> {
    let original_url = match request.params().text("redirect_url") {
        Some(target) => urls.absolute_url(&target)?,
        None => String::new(),
    };
    let request_token = tokens.encrypted_token()?;
    let idp = registry
        .default_provider()
        .map(|id| id.as_str().to_string())
        .unwrap_or_default();

    let params = BTreeMap::from([
        ("requesttoken".to_string(), request_token),
        ("originalUrl".to_string(), original_url),
        ("idp".to_string(), idp),
    ]);
    let location = urls.link_to_route_absolute(RouteName::Login, &params)?;
    debug!(idp = %params["idp"], "redirecting to federated login");

    Ok(RedirectDecision::RedirectTo(Redirect {
        route: RouteName::Login,
        params,
        location,
    }))
}
