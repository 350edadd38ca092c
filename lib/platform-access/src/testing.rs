//! Test doubles for the host services.

use crate::collaborators::{
    Collaborators, CsrfTokenIssuer, HeaderAuthOutcome, HeaderAuthenticator, Localizer,
    UrlGenerator,
};
use crate::error::GateError;
use crate::request::RequestContext;
use rootcause::Report;
use sso_gate_core::RouteName;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

pub const BASE_URL: &str = "https://cloud.example.com";

/// Prefixes every message with `[de] `.
pub struct FakeLocalizer;

impl Localizer for FakeLocalizer {
    fn translate(&self, message_id: &str) -> Result<String, Report<GateError>> {
        Ok(format!("[de] {message_id}"))
    }
}

/// Builds URLs under [`BASE_URL`].
pub struct FakeUrls;

impl UrlGenerator for FakeUrls {
    fn link_to_route_absolute(
        &self,
        route: RouteName,
        params: &BTreeMap<String, String>,
    ) -> Result<String, Report<GateError>> {
        let query: Vec<String> = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect();
        Ok(format!("{BASE_URL}{}?{}", route.path(), query.join("&")))
    }

    fn absolute_url(&self, target: &str) -> Result<String, Report<GateError>> {
        Ok(format!("{BASE_URL}{target}"))
    }
}

/// Always issues the same token.
pub struct FakeTokens;

impl CsrfTokenIssuer for FakeTokens {
    fn encrypted_token(&self) -> Result<String, Report<GateError>> {
        Ok("token-abc:pad-xyz".to_string())
    }
}

/// Lets every request continue.
pub struct FakeHeaderAuth;

impl HeaderAuthenticator for FakeHeaderAuth {
    fn authenticate(
        &self,
        _request: &RequestContext,
    ) -> Result<HeaderAuthOutcome, Report<GateError>> {
        Ok(HeaderAuthOutcome::Continue)
    }
}

/// How a [`Broken`] collaborator misbehaves.
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Error,
    Panic,
}

/// A collaborator that fails every call.
pub struct Broken(pub Failure);

impl Broken {
    fn fail<T>(&self, what: &str) -> Result<T, Report<GateError>> {
        match self.0 {
            Failure::Error => Err(GateError::TokenIssuance {
                reason: format!("{what} unavailable"),
            }
            .into()),
            Failure::Panic => panic!("{what} exploded"),
        }
    }
}

impl Localizer for Broken {
    fn translate(&self, _message_id: &str) -> Result<String, Report<GateError>> {
        self.fail("localizer")
    }
}

impl UrlGenerator for Broken {
    fn link_to_route_absolute(
        &self,
        _route: RouteName,
        _params: &BTreeMap<String, String>,
    ) -> Result<String, Report<GateError>> {
        self.fail("url generator")
    }

    fn absolute_url(&self, _target: &str) -> Result<String, Report<GateError>> {
        self.fail("url generator")
    }
}

impl CsrfTokenIssuer for Broken {
    fn encrypted_token(&self) -> Result<String, Report<GateError>> {
        self.fail("token issuer")
    }
}

impl HeaderAuthenticator for Broken {
    fn authenticate(
        &self,
        _request: &RequestContext,
    ) -> Result<HeaderAuthOutcome, Report<GateError>> {
        self.fail("header authenticator")
    }
}

/// The well-behaved set of collaborators.
pub fn fakes() -> Collaborators {
    Collaborators::new(
        Arc::new(FakeLocalizer),
        Arc::new(FakeUrls),
        Arc::new(FakeTokens),
        Arc::new(FakeHeaderAuth),
    )
}

/// Counts `ERROR` events.
#[derive(Clone, Default)]
pub struct ErrorCounter(Arc<AtomicUsize>);

impl ErrorCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::ERROR {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}
