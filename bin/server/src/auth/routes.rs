//! Landing routes for the destinations the gate redirects to.
//!
//! The federated login page stands in for the identity provider handshake
//! and the local login page for the host application's password form.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use sso_gate_core::paths;
use sso_gate_platform_access::CsrfTokenIssuer;
use std::sync::Arc;

use super::{AppState, SESSION_COOKIE};

/// Query parameters of the federated login route.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FederatedLoginQuery {
    #[serde(default)]
    requesttoken: String,
    #[serde(default)]
    original_url: String,
    #[serde(default)]
    idp: String,
}

/// Query parameters of the provider selection route.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectBackendQuery {
    #[serde(default)]
    redirect_url: String,
}

/// Query parameters of the error route.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorQuery {
    #[serde(default)]
    message: String,
}

/// Query parameters of the local login route.
#[derive(Debug, Default, Deserialize)]
pub struct LocalLoginQuery {
    #[serde(default)]
    redirect_url: String,
}

/// Entry point of the federated handshake.
///
/// Checks the request token the gate attached and hands over to the chosen
/// identity provider.
pub async fn federated_login(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FederatedLoginQuery>,
) -> Response {
    if !state.tokens.verify(&query.requesttoken) {
        tracing::warn!(idp = %query.idp, "federated login with invalid request token");
        return (StatusCode::BAD_REQUEST, "Invalid request token").into_response();
    }

    let provider = state
        .gate
        .snapshot()
        .registry
        .providers()
        .iter()
        .find(|provider| provider.id.as_str() == query.idp);
    let Some(provider) = provider else {
        return (StatusCode::NOT_FOUND, "Unknown identity provider").into_response();
    };

    tracing::info!(idp = %provider.id, "starting federated login");
    page(
        "Sign in",
        &format!(
            "<p>Continue with {}.</p><p>You will be returned to <code>{}</code>.</p>",
            escape_html(&provider.display_name),
            escape_html(&query.original_url),
        ),
    )
    .into_response()
}

/// Lists the login options when more than one is available.
pub async fn select_backend(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SelectBackendQuery>,
) -> Response {
    let snapshot = state.gate.snapshot();
    let web_root = snapshot.web_root.as_str();
    let redirect_url = urlencoding::encode(&query.redirect_url);

    let mut items = String::new();
    for provider in snapshot.registry.providers() {
        let token = match state.tokens.encrypted_token() {
            Ok(token) => token,
            Err(e) => {
                tracing::error!(error = %e, "failed to issue request token");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };
        let href = format!(
            "{web_root}{}?idp={}&requesttoken={}&originalUrl={redirect_url}",
            paths::FEDERATED_LOGIN,
            urlencoding::encode(provider.id.as_str()),
            urlencoding::encode(&token),
        );
        items.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>",
            escape_html(&href),
            escape_html(&provider.display_name)
        ));
    }
    if snapshot.registry.allows_multiple_backends() {
        let href = format!(
            "{web_root}{}?direct=1&redirect_url={redirect_url}",
            paths::LOGIN
        );
        items.push_str(&format!(
            "<li><a href=\"{}\">Direct log in</a></li>",
            escape_html(&href)
        ));
    }

    page("Choose how to log in", &format!("<ul>{items}</ul>")).into_response()
}

/// Shows an error message to the user.
pub async fn error_page(Query(query): Query<ErrorQuery>) -> Response {
    (
        StatusCode::FORBIDDEN,
        page("Error", &format!("<p>{}</p>", escape_html(&query.message))),
    )
        .into_response()
}

/// The host application's own login form.
pub async fn local_login(Query(query): Query<LocalLoginQuery>) -> Response {
    page(
        "Log in",
        &format!(
            "<form method=\"post\"><input type=\"hidden\" name=\"redirect_url\" value=\"{}\">\
             <input name=\"user\"><input name=\"password\" type=\"password\">\
             <button>Log in</button></form>",
            escape_html(&query.redirect_url)
        ),
    )
    .into_response()
}

/// Landing page.
pub async fn index() -> Response {
    page("sso-gate", "<p>Request gate is running.</p>").into_response()
}

/// Ends the current session.
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.delete(cookie.value()).await;
    }

    let remove_session = Cookie::build((SESSION_COOKIE, "")).path("/");
    (jar.remove(remove_session), Redirect::to("/"))
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>{title}</title></head>\
         <body><h1>{title}</h1>{body}</body></html>"
    ))
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
