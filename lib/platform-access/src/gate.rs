//! The request gate: runs the pipeline and enforces fail-open.

use crate::collaborators::Collaborators;
use crate::config::GateSnapshot;
use crate::decision::{Evaluation, RedirectDecision};
use crate::error::GateError;
use crate::pipeline::desktop::{self, DesktopCheck};
use crate::pipeline::login::{self, LoginCheck};
use crate::pipeline::{Step, enablement, mode, selection, target};
use crate::request::RequestContext;
use crate::user::SessionUser;
use rootcause::Report;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Decides, per request, whether it continues or is redirected into the
/// federated login flow.
///
/// A gate is built once at boot and shared between requests; evaluation
/// never mutates it.
#[derive(Debug, Clone)]
pub struct Gate {
    snapshot: Arc<GateSnapshot>,
    collaborators: Collaborators,
}

impl Gate {
    /// Creates a gate over a configuration snapshot.
    #[must_use]
    pub fn new(snapshot: Arc<GateSnapshot>, collaborators: Collaborators) -> Self {
        Self {
            snapshot,
            collaborators,
        }
    }

    /// Returns the configuration snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &GateSnapshot {
        &self.snapshot
    }

    /// Evaluates one request.
    ///
    /// Never fails: if any stage errors or panics, the failure is logged once
    /// and the request passes through as if the gate were disabled.
    #[instrument(skip_all, fields(path = request.path(), logged_in = user.is_some()))]
    pub fn evaluate(&self, request: &RequestContext, user: Option<&SessionUser>) -> Evaluation {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.decide(request, user)))
            .unwrap_or_else(|payload| {
                Err(GateError::Panicked {
                    details: panic_details(payload.as_ref()),
                }
                .into())
            });

        match outcome {
            Ok(decision) => {
                if let Some(redirect) = decision.redirect() {
                    info!(route = %redirect.route, "request redirected");
                } else if decision == RedirectDecision::Terminate {
                    info!("request terminated");
                }
                Evaluation::decided(decision)
            }
            Err(report) => {
                error!(error = %report, "request gate failed, letting request through");
                Evaluation::failed_open(report)
            }
        }
    }

    fn decide(
        &self,
        request: &RequestContext,
        user: Option<&SessionUser>,
    ) -> Result<RedirectDecision, Report<GateError>> {
        let snapshot = &*self.snapshot;
        let services = &self.collaborators;

        if let Step::Decide(decision) =
            mode::select(&snapshot.auth, request, services.header_auth.as_ref())?
        {
            return Ok(decision);
        }
        if let Step::Decide(decision) = enablement::check(
            user,
            request,
            services.localizer.as_ref(),
            services.urls.as_ref(),
        )? {
            return Ok(decision);
        }

        let logged_in = user.is_some();
        let mut pending = match login::check(request, logged_in) {
            LoginCheck::Bypass => return Ok(RedirectDecision::PassThrough),
            LoginCheck::Intercept => true,
            LoginCheck::NotApplicable => false,
        };
        match desktop::check(snapshot, request, logged_in) {
            DesktopCheck::Redirect => pending = true,
            DesktopCheck::Compatible => pending = false,
            DesktopCheck::NotApplicable => {}
        }
        if !pending {
            return Ok(RedirectDecision::PassThrough);
        }
        debug!("login redirect pending");

        if let Step::Decide(decision) =
            selection::route(&snapshot.registry, request, services.urls.as_ref())?
        {
            return Ok(decision);
        }
        target::build(
            &snapshot.registry,
            request,
            services.urls.as_ref(),
            services.tokens.as_ref(),
        )
    }
}

fn panic_details(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
