//! sso-gate web server.
//!
//! This crate hosts the federated-login request gate in front of an Axum
//! application and serves the landing pages the gate redirects to.

pub mod auth;
pub mod config;
pub mod error;

use auth::AppState;
use axum::{Router, middleware, routing::get};
use sso_gate_core::paths;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Front controller prefix the routes are also served under.
const FRONT_CONTROLLER: &str = "/index.php";

/// Builds the application router with the gate in front of every route.
pub fn router(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        .route("/", get(auth::index))
        .route(paths::LOGIN, get(auth::local_login))
        .route("/logout", get(auth::logout))
        .route(paths::FEDERATED_LOGIN, get(auth::federated_login))
        .route(paths::SELECT_BACKEND, get(auth::select_backend))
        .route(paths::ERROR, get(auth::error_page));
    let routes = routes.clone().nest(FRONT_CONTROLLER, routes);

    let web_root = state.gate.snapshot().web_root.clone();
    let app = if web_root.is_empty() {
        routes
    } else {
        Router::new().nest(&web_root, routes)
    };

    app.layer(middleware::from_fn_with_state(state.clone(), auth::enforce))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
