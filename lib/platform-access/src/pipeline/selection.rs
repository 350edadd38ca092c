//! Identity-provider selection.

use crate::collaborators::UrlGenerator;
use crate::config::ProviderRegistry;
use crate::decision::{Redirect, RedirectDecision};
use crate::error::GateError;
use crate::pipeline::Step;
use crate::request::RequestContext;
use rootcause::Report;
use sso_gate_core::RouteName;
use std::collections::BTreeMap;
use tracing::debug;

/// Sends a pending login to the provider selection page when more than one
/// way to log in exists.
pub fn route(
    registry: &ProviderRegistry,
    request: &RequestContext,
    urls: &dyn UrlGenerator,
) -> Result<Step, Report<GateError>> {
    if !registry.shows_login_options() {
        return Ok(Step::Continue);
    }

    let redirect_url = request
        .params()
        .text("redirect_url")
        .map(|url| url.into_owned())
        .unwrap_or_default();
    let params = BTreeMap::from([("redirectUrl".to_string(), redirect_url)]);
    let location = urls.link_to_route_absolute(RouteName::SelectUserBackEnd, &params)?;
    debug!(
        providers = registry.len(),
        multiple_backends = registry.allows_multiple_backends(),
        "login requires provider selection"
    );

    Ok(Step::Decide(RedirectDecision::RedirectTo(Redirect {
        route: RouteName::SelectUserBackEnd,
        params,
        location,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IdentityProvider;
    use crate::request::QueryParams;
    use crate::testing::FakeUrls;

    fn two_providers() -> ProviderRegistry {
        ProviderRegistry::new()
            .with_provider(IdentityProvider::new("1", "Okta"))
            .with_provider(IdentityProvider::new("2", "Azure"))
    }

    #[test]
    fn single_provider_continues() {
        let registry = ProviderRegistry::new().with_provider(IdentityProvider::new("1", "Okta"));
        let request = RequestContext::new("/login", "/login");

        assert_eq!(route(&registry, &request, &FakeUrls).expect("step"), Step::Continue);
    }

    #[test]
    fn several_providers_select_with_redirect_url() {
        let request = RequestContext::new("/login", "/login")
            .with_params(QueryParams::new().with("redirect_url", "/apps/files"));

        let step = route(&two_providers(), &request, &FakeUrls).expect("step");

        let Step::Decide(RedirectDecision::RedirectTo(redirect)) = step else {
            panic!("expected redirect, got {step:?}");
        };
        assert_eq!(redirect.route, RouteName::SelectUserBackEnd);
        assert_eq!(redirect.param("redirectUrl"), Some("/apps/files"));
    }

    #[test]
    fn multiple_backends_select_even_with_one_provider() {
        let registry = ProviderRegistry::new()
            .with_provider(IdentityProvider::new("1", "Okta"))
            .with_multiple_backends(true);
        let request = RequestContext::new("/login", "/login");

        let step = route(&registry, &request, &FakeUrls).expect("step");

        let Step::Decide(RedirectDecision::RedirectTo(redirect)) = step else {
            panic!("expected redirect, got {step:?}");
        };
        assert_eq!(redirect.param("redirectUrl"), Some(""));
    }
}
