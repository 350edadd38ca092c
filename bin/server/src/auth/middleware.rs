//! Gate middleware for Axum.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Method, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use sso_gate_platform_access::request::strip_path_prefix;
use sso_gate_platform_access::{QueryParams, RedirectDecision, RequestContext};
use std::sync::Arc;

use super::AppState;
use crate::error::ServerError;

/// Front controller the application is also reachable through.
const FRONT_CONTROLLER: &str = "/index.php";

/// Middleware that runs the request gate before any handler.
pub async fn enforce(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    req: Request<Body>,
    next: Next,
) -> Response {
    let context = request_context(&req, &state.gate.snapshot().web_root);
    let user = state.sessions.user_from_cookies(&jar).await;

    match state.gate.evaluate(&context, user.as_ref()).into_decision() {
        RedirectDecision::PassThrough => next.run(req).await,
        RedirectDecision::RedirectTo(redirect) => {
            match HeaderValue::from_str(&redirect.location) {
                Ok(location) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
                Err(e) => {
                    let err = ServerError::InvalidRedirect {
                        location: redirect.location.escape_debug().to_string(),
                        details: e.to_string(),
                    };
                    tracing::error!(error = %err, "gate redirect dropped, letting request through");
                    next.run(req).await
                }
            }
        }
        RedirectDecision::Terminate => StatusCode::UNAUTHORIZED.into_response(),
    }
}

/// Captures the gate-relevant parts of a request.
pub fn request_context(req: &Request<Body>, web_root: &str) -> RequestContext {
    let uri = req.uri();
    let full_uri = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string());

    let mut context = RequestContext::new(routed_path(uri.path(), web_root), full_uri);
    if params_supported(req.method()) {
        context = context.with_params(QueryParams::from_query_str(uri.query().unwrap_or("")));
    }
    for (name, value) in req.headers() {
        if let Ok(value) = value.to_str() {
            context = context.with_header(name.as_str(), value);
        }
    }
    context
}

/// Strips the web root and front controller from a request path.
fn routed_path(path: &str, web_root: &str) -> String {
    let path = strip_path_prefix(path, web_root);
    let path = strip_path_prefix(path, FRONT_CONTROLLER);
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

/// Bodies of these methods are streamed to handlers untouched, so their
/// parameters are never parsed.
fn params_supported(method: &Method) -> bool {
    method != Method::PUT && method != Method::PATCH
}
