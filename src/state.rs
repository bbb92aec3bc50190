//! Shared application state.
//!
//! Contains what every command handler needs: the configuration and a
//! handle on the session controller.

use crate::auth::AuthContext;
use crate::config::ConfigV1;
use std::sync::Arc;

/// Application state shared across all command handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Read/act handle on the session controller.
    pub auth: AuthContext,
}
