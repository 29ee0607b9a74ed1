//! Session-gated request router.
//!
//! DESIGN
//! ======
//! Every navigation passes through a single gate before any handler runs.
//! The gate looks at exactly two inputs: the request path and the presence
//! of the session marker cookies. Classification against a fixed route
//! table plus the marker-presence bit fully determines the outcome — allow
//! the request, or redirect to the login page / dashboard. The decision is
//! a pure function of `(path, markers)`: no I/O, no shared state, safe to
//! evaluate concurrently for unrelated requests.
//!
//! TRADE-OFFS
//! ==========
//! Marker presence alone counts as "authenticated"; token contents are
//! never validated here. Pages that actually read data re-check against the
//! identity provider, which keeps the gate synchronous and I/O-free at the
//! cost of letting a stale marker reach a page shell. Unknown and malformed
//! paths classify as public, so the gate can never lock a user out of a
//! route it does not know about.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::state::AppState;

/// Cookie carrying the short-lived access credential.
pub const ACCESS_MARKER: &str = "access_token";
/// Cookie carrying the long-lived refresh credential.
pub const REFRESH_MARKER: &str = "refresh_token";

// =============================================================================
// MARKERS
// =============================================================================

/// Which session markers are present on a request.
///
/// A marker cookie with an empty value counts as absent — expired cookies
/// are cleared by writing an empty value, and those must not read as a
/// session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Markers {
    pub access: bool,
    pub refresh: bool,
}

impl Markers {
    #[must_use]
    pub fn from_jar(jar: &CookieJar) -> Self {
        Self {
            access: marker_present(jar, ACCESS_MARKER),
            refresh: marker_present(jar, REFRESH_MARKER),
        }
    }

    /// Either marker alone is sufficient evidence of a session.
    #[must_use]
    pub fn any(self) -> bool {
        self.access || self.refresh
    }
}

fn marker_present(jar: &CookieJar, name: &str) -> bool {
    jar.get(name)
        .map(Cookie::value)
        .is_some_and(|v| !v.is_empty())
}

// =============================================================================
// ROUTE TABLE
// =============================================================================

/// A single configured path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePattern {
    /// Matches the path exactly.
    Exact(&'static str),
    /// Matches any path starting with the given prefix.
    Prefix(&'static str),
}

impl RoutePattern {
    fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(p) => path == *p,
            Self::Prefix(p) => path.starts_with(p),
        }
    }

    /// Whether some path could match both patterns.
    fn overlaps(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) => a == b,
            (Self::Exact(a), Self::Prefix(b)) => a.starts_with(b),
            (Self::Prefix(a), Self::Exact(b)) => b.starts_with(a),
            (Self::Prefix(a), Self::Prefix(b)) => a.starts_with(b) || b.starts_with(a),
        }
    }
}

/// Constraint category a path classifies into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Requires a session.
    Protected,
    /// Must not be visited while a session exists.
    AuthOnly,
    /// No constraint.
    Public,
}

/// Symbolic redirect destination, resolved to a URL by [`RedirectTargets`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    Login,
    Dashboard,
}

/// Outcome of gating one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    RedirectTo(RedirectTarget),
}

#[derive(Debug, thiserror::Error)]
pub enum RouteTableError {
    #[error("protected pattern {protected:?} overlaps auth-only pattern {auth_only:?}")]
    Overlap {
        protected: RoutePattern,
        auth_only: RoutePattern,
    },
}

/// The static pattern table the gate classifies against.
#[derive(Debug, Clone)]
pub struct RouteTable {
    protected: Vec<RoutePattern>,
    auth_only: Vec<RoutePattern>,
}

impl RouteTable {
    /// Build a table from explicit pattern sets.
    ///
    /// # Errors
    ///
    /// Returns [`RouteTableError::Overlap`] when a protected and an
    /// auth-only pattern could match the same path. Overlap would make the
    /// decision table ambiguous, so it is refused at startup rather than
    /// resolved per request.
    pub fn new(protected: Vec<RoutePattern>, auth_only: Vec<RoutePattern>) -> Result<Self, RouteTableError> {
        for p in &protected {
            if let Some(a) = auth_only.iter().find(|a| p.overlaps(a)) {
                return Err(RouteTableError::Overlap { protected: p.clone(), auth_only: a.clone() });
            }
        }
        Ok(Self { protected, auth_only })
    }

    /// The fixed table this application ships with.
    ///
    /// # Errors
    ///
    /// Returns an error if the shipped pattern sets overlap; `main` treats
    /// that as a startup failure.
    pub fn standard() -> Result<Self, RouteTableError> {
        Self::new(
            vec![RoutePattern::Exact("/dashboard"), RoutePattern::Prefix("/dashboard/")],
            vec![RoutePattern::Exact("/login"), RoutePattern::Exact("/register")],
        )
    }

    /// Classify a request path. Protected patterns win; paths that do not
    /// parse as an absolute URL path classify as public (fail-open).
    #[must_use]
    pub fn classify(&self, path: &str) -> RouteClass {
        if !path.starts_with('/') {
            return RouteClass::Public;
        }
        if self.protected.iter().any(|p| p.matches(path)) {
            return RouteClass::Protected;
        }
        if self.auth_only.iter().any(|p| p.matches(path)) {
            return RouteClass::AuthOnly;
        }
        RouteClass::Public
    }

    /// The decision table: (category × session present) → decision.
    #[must_use]
    pub fn decide(&self, path: &str, markers: Markers) -> Decision {
        let authenticated = markers.any();
        match (self.classify(path), authenticated) {
            (RouteClass::Protected, false) => Decision::RedirectTo(RedirectTarget::Login),
            (RouteClass::Protected, true) | (RouteClass::AuthOnly, false) | (RouteClass::Public, _) => Decision::Allow,
            (RouteClass::AuthOnly, true) => Decision::RedirectTo(RedirectTarget::Dashboard),
        }
    }
}

// =============================================================================
// REDIRECT TARGETS
// =============================================================================

/// Concrete URLs for the gate's symbolic destinations.
#[derive(Debug, Clone)]
pub struct RedirectTargets {
    pub login: String,
    pub dashboard: String,
}

impl RedirectTargets {
    /// Load from `LOGIN_URL` / `DASHBOARD_URL`, defaulting to the local
    /// page routes.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            login: std::env::var("LOGIN_URL").unwrap_or_else(|_| "/login".to_owned()),
            dashboard: std::env::var("DASHBOARD_URL").unwrap_or_else(|_| "/dashboard".to_owned()),
        }
    }

    #[must_use]
    pub fn url_for(&self, target: RedirectTarget) -> &str {
        match target {
            RedirectTarget::Login => &self.login,
            RedirectTarget::Dashboard => &self.dashboard,
        }
    }
}

// =============================================================================
// MIDDLEWARE
// =============================================================================

/// Gate middleware, evaluated once per navigation before any handler.
///
/// Only marker extraction and response mapping live here; every decision
/// comes from [`RouteTable::decide`] so the table is testable without a
/// running server.
pub async fn session_gate(State(state): State<AppState>, jar: CookieJar, req: Request, next: Next) -> Response {
    let markers = Markers::from_jar(&jar);
    let path = req.uri().path().to_owned();
    match state.routes.decide(&path, markers) {
        Decision::Allow => next.run(req).await,
        Decision::RedirectTo(target) => {
            tracing::debug!(%path, ?target, "gated navigation redirected");
            Redirect::temporary(state.targets.url_for(target)).into_response()
        }
    }
}

#[cfg(test)]
#[path = "gate_test.rs"]
mod tests;
