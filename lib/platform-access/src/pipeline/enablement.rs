//! Disabled-account blocking.

use crate::collaborators::{DISABLED_ACCOUNT_MESSAGE, Localizer, UrlGenerator};
use crate::decision::{Redirect, RedirectDecision};
use crate::error::GateError;
use crate::pipeline::Step;
use crate::request::RequestContext;
use crate::user::SessionUser;
use rootcause::Report;
use sso_gate_core::{RouteName, paths};
use std::collections::BTreeMap;
use tracing::debug;

/// Sends disabled users to the generic error page.
///
/// A disabled user is blocked on every path except the error page itself.
pub fn check(
    user: Option<&SessionUser>,
    request: &RequestContext,
    localizer: &dyn Localizer,
    urls: &dyn UrlGenerator,
) -> Result<Step, Report<GateError>> {
    let Some(user) = user else {
        return Ok(Step::Continue);
    };
    if user.is_enabled() {
        return Ok(Step::Continue);
    }
    if request.path() == paths::ERROR {
        debug!(uid = user.uid(), "disabled user on error page");
        return Ok(Step::Decide(RedirectDecision::PassThrough));
    }

    let message = localizer.translate(DISABLED_ACCOUNT_MESSAGE)?;
    let params = BTreeMap::from([("message".to_string(), message)]);
    let location = urls.link_to_route_absolute(RouteName::GenericError, &params)?;
    debug!(uid = user.uid(), "blocking disabled user");

    Ok(Step::Decide(RedirectDecision::RedirectTo(Redirect {
        route: RouteName::GenericError,
        params,
        location,
    })))
}
