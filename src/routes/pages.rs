//! Static page collaborators.
//!
//! Pages render fixed template content. The only dynamic bit is the
//! signed-in user's email on the account pages, which re-check the session
//! against the identity provider before rendering — the gate admits on
//! marker presence alone, the store has the final word on data access.

use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::gate::ACCESS_MARKER;
use crate::state::AppState;

const HOME_TEMPLATE: &str = include_str!("../../templates/home.html");
const DASHBOARD_TEMPLATE: &str = include_str!("../../templates/dashboard.html");
const REPORTS_TEMPLATE: &str = include_str!("../../templates/reports.html");
const REGISTER_TEMPLATE: &str = include_str!("../../templates/register.html");
const TERMS_TEMPLATE: &str = include_str!("../../templates/terms.html");
const PRIVACY_TEMPLATE: &str = include_str!("../../templates/privacy.html");

pub async fn home() -> Html<&'static str> {
    Html(HOME_TEMPLATE)
}

pub async fn register() -> Html<&'static str> {
    Html(REGISTER_TEMPLATE)
}

pub async fn terms() -> Html<&'static str> {
    Html(TERMS_TEMPLATE)
}

pub async fn privacy() -> Html<&'static str> {
    Html(PRIVACY_TEMPLATE)
}

/// `GET /dashboard` — portfolio widgets over fixed demo data.
pub async fn dashboard(State(state): State<AppState>, jar: CookieJar) -> Response {
    render_account_page(&state, &jar, DASHBOARD_TEMPLATE).await
}

/// `GET /dashboard/reports` — statement archive over fixed demo data.
pub async fn reports(State(state): State<AppState>, jar: CookieJar) -> Response {
    render_account_page(&state, &jar, REPORTS_TEMPLATE).await
}

async fn render_account_page(state: &AppState, jar: &CookieJar, template: &str) -> Response {
    let Some(access) = jar
        .get(ACCESS_MARKER)
        .map(Cookie::value)
        .filter(|v| !v.is_empty())
    else {
        return Redirect::temporary(&state.targets.login).into_response();
    };

    match state.store.current_session(access).await {
        Ok(Some(session)) => Html(template.replace("{{EMAIL}}", &session.user.email)).into_response(),
        Ok(None) => Redirect::temporary(&state.targets.login).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "session re-check failed; returning to sign-in");
            Redirect::temporary(&state.targets.login).into_response()
        }
    }
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
