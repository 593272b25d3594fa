//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It is
//! immutable after startup: the parsed config and the portal client. Each
//! `/login` request is an independent portal call, so nothing here is locked.

use std::sync::Arc;

use crate::config::PortalConfig;
use crate::services::portal::PortalAuth;

/// Clone is required by Axum; inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PortalConfig>,
    pub portal: Arc<dyn PortalAuth>,
}

impl AppState {
    #[must_use]
    pub fn new(config: PortalConfig, portal: Arc<dyn PortalAuth>) -> Self {
        Self { config: Arc::new(config), portal }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
