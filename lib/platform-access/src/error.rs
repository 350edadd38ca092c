//! Error types for the platform-access crate.
//!
//! Errors are designed for layered context using rootcause. Every failure the
//! gate can hit is a `GateError`; the engine boundary turns any of them into a
//! fail-open evaluation instead of returning it to the host.

use sso_gate_core::RouteName;
use std::fmt;

/// Errors raised while evaluating the gate for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    /// The header-derived authentication trigger failed.
    HeaderAuthentication { reason: String },
    /// A localized message could not be produced.
    Localization { message_id: String, reason: String },
    /// An absolute URL could not be built for a route.
    UrlGeneration { route: RouteName, reason: String },
    /// An absolute URL could not be built for a relative redirect target.
    AbsoluteUrl { target: String, reason: String },
    /// The anti-forgery token issuer failed.
    TokenIssuance { reason: String },
    /// A pipeline stage panicked.
    Panicked { details: String },
}

impl fmt::Display for GateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeaderAuthentication { reason } => {
                write!(f, "header-derived authentication failed: {reason}")
            }
            Self::Localization { message_id, reason } => {
                write!(f, "failed to localize message '{message_id}': {reason}")
            }
            Self::UrlGeneration { route, reason } => {
                write!(f, "failed to build URL for route '{route}': {reason}")
            }
            Self::AbsoluteUrl { target, reason } => {
                write!(f, "failed to resolve '{target}' to an absolute URL: {reason}")
            }
            Self::TokenIssuance { reason } => {
                write!(f, "failed to issue request token: {reason}")
            }
            Self::Panicked { details } => {
                write!(f, "gate evaluation panicked: {details}")
            }
        }
    }
}

impl std::error::Error for GateError {}
