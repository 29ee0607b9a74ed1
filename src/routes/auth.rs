//! Auth routes — login form, credential submission, sign-out.
//!
//! SYSTEM CONTEXT
//! ==============
//! The gate already bounces signed-in users away from `/login`; these
//! handlers cover the other half of the contract. On a successful sign-in
//! the marker cookies ride the redirect response itself, so the gate
//! observes them on the very next navigation.

use axum::extract::{Form, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;

use crate::gate::{ACCESS_MARKER, REFRESH_MARKER};
use crate::services::flow::{LoginFlow, Outcome};
use crate::state::AppState;

const LOGIN_TEMPLATE: &str = include_str!("../../templates/login.html");

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

/// Whether marker cookies carry the `Secure` attribute: explicit
/// `COOKIE_SECURE`, else inferred from an https `PUBLIC_BASE_URL`.
pub(crate) fn cookie_secure() -> bool {
    if let Some(value) = env_bool("COOKIE_SECURE") {
        return value;
    }

    std::env::var("PUBLIC_BASE_URL")
        .map(|uri| uri.starts_with("https://"))
        .unwrap_or(false)
}

// =============================================================================
// COOKIES
// =============================================================================

fn marker_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

fn expired_marker(name: &'static str, secure: bool) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

// =============================================================================
// RENDERING
// =============================================================================

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn render_login(message: Option<&str>) -> Html<String> {
    let notice = message
        .map(|m| format!(r#"<p class="form-error">{}</p>"#, escape_html(m)))
        .unwrap_or_default();
    Html(LOGIN_TEMPLATE.replace("{{MESSAGE}}", &notice))
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// `GET /login` — render the sign-in form.
///
/// An existing session short-circuits straight to the dashboard. The check
/// runs once against the session store; a store failure just shows the
/// form rather than granting access.
pub async fn login_page(State(state): State<AppState>, jar: CookieJar) -> Response {
    let flow = LoginFlow::new(state.store.clone());
    let access = jar.get(ACCESS_MARKER).map(Cookie::value);
    if flow.existing_session(access).await.is_some() {
        return Redirect::temporary(&state.targets.dashboard).into_response();
    }
    render_login(None).into_response()
}

/// `POST /login` — drive one credential submission.
pub async fn login_submit(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let flow = LoginFlow::new(state.store.clone());
    match flow.submit(form.email.trim(), &form.password).await {
        Some(Outcome::Success { session, navigate_to }) => {
            let jar = CookieJar::new().add(marker_cookie(ACCESS_MARKER, session.access_token, state.cookie_secure));
            let jar = match session.refresh_token {
                Some(token) => jar.add(marker_cookie(REFRESH_MARKER, token, state.cookie_secure)),
                None => jar,
            };
            (jar, Redirect::temporary(state.targets.url_for(navigate_to))).into_response()
        }
        Some(Outcome::Failure { message }) => render_login(Some(&message)).into_response(),
        // A fresh per-request flow has nothing in flight; suppression only
        // bites on a shared live form instance.
        None => render_login(None).into_response(),
    }
}

/// `POST /logout` — clear both markers and return to the login page.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let jar = CookieJar::new()
        .add(expired_marker(ACCESS_MARKER, state.cookie_secure))
        .add(expired_marker(REFRESH_MARKER, state.cookie_secure));
    (jar, Redirect::temporary(&state.targets.login))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
