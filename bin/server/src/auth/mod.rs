//! Request gating for the sso-gate server.
//!
//! This module provides:
//! - Host implementations of the gate's collaborators (URLs, messages,
//!   request tokens, trusted-header authentication)
//! - In-memory session lookup
//! - The Axum middleware that runs the gate on every request
//! - Landing handlers for the routes the gate redirects to
//!
//! # Gating Model
//!
//! The gate runs before any handler. It only decides where a request goes;
//! the federated handshake itself (assertions, certificates, metadata) is
//! handled by the identity provider integration behind the login route.

pub mod host;
pub mod middleware;
pub mod routes;
pub mod session;

use crate::config::ServerConfig;
use crate::error::ServerError;
use rootcause::Report;
use sso_gate_platform_access::{Collaborators, Gate, GateSnapshot};
use std::sync::Arc;

pub use host::{Catalog, MaskedTokens, RouteUrls, TrustedHeader};
pub use middleware::enforce;
pub use routes::{error_page, federated_login, index, local_login, logout, select_backend};
pub use session::{SESSION_COOKIE, SessionStore};

/// Shared application state.
pub struct AppState {
    /// The request gate.
    pub gate: Gate,
    /// Session lookup.
    pub sessions: SessionStore,
    /// Request token issuer shared with the gate.
    pub tokens: MaskedTokens,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(gate: Gate, sessions: SessionStore, tokens: MaskedTokens) -> Self {
        Self {
            gate,
            sessions,
            tokens,
        }
    }

    /// Builds the gate and its collaborators from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the gate configuration is invalid.
    pub fn from_config(config: &ServerConfig) -> Result<Self, Report<ServerError>> {
        let snapshot: GateSnapshot = config.gate_snapshot()?;
        let tokens = MaskedTokens::new();
        let collaborators = Collaborators::new(
            Arc::new(Catalog::for_language(&config.language)),
            Arc::new(RouteUrls::new(&config.base_url, &config.web_root)),
            Arc::new(tokens.clone()),
            Arc::new(TrustedHeader::new(
                config.gate.trusted_header.clone(),
                config.gate.require_trusted_header,
            )),
        );
        let gate = Gate::new(Arc::new(snapshot), collaborators);
        Ok(Self::new(gate, SessionStore::new(), tokens))
    }
}
