//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! carries the identity-provider client behind a trait object, the static
//! route table the gate classifies against, and the resolved redirect
//! targets. Everything is immutable after startup; handlers share it by
//! cheap clone, so gate evaluations for unrelated requests never contend.

use std::sync::Arc;

use crate::gate::{RedirectTargets, RouteTable};
use crate::services::session::SessionStore;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum — all inner fields are Arc-wrapped or Copy.
#[derive(Clone)]
pub struct AppState {
    /// Identity provider the app signs in against. Trait object so tests
    /// can swap in a fake.
    pub store: Arc<dyn SessionStore>,
    /// Static route classification table.
    pub routes: Arc<RouteTable>,
    /// Concrete URLs for the gate's symbolic redirect destinations.
    pub targets: Arc<RedirectTargets>,
    /// Whether marker cookies are issued with the `Secure` attribute.
    pub cookie_secure: bool,
}

impl AppState {
    #[must_use]
    pub fn new(
        store: Arc<dyn SessionStore>,
        routes: RouteTable,
        targets: RedirectTargets,
        cookie_secure: bool,
    ) -> Self {
        Self { store, routes: Arc::new(routes), targets: Arc::new(targets), cookie_secure }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
