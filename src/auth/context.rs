//! Process-wide access to the session controller.
//!
//! `AuthProvider` is created once at the composition root and runs the
//! startup probe; everything else gets an `AuthContext` handle, which can
//! read the state and trigger actions but never write the state directly.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::gateway::IdentityGateway;
use crate::models::SessionState;

use super::controller::AuthController;

/// Cheap, clonable handle on the shared controller.
#[derive(Clone)]
pub struct AuthContext {
    controller: Arc<AuthController>,
}

impl AuthContext {
    pub fn state(&self) -> SessionState {
        self.controller.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.controller.subscribe()
    }

    /// Resolves once no probe is in flight and returns that state.
    pub async fn wait_until_settled(&self) -> SessionState {
        let mut rx = self.subscribe();
        let settled = match rx.wait_for(|state| !state.is_loading).await {
            Ok(state) => state.clone(),
            // The controller outlives every handle, so the sender cannot be gone.
            Err(_) => self.state(),
        };
        settled
    }

    pub fn login_url(&self) -> String {
        self.controller.login_url()
    }

    pub async fn check_auth(&self) {
        self.controller.check_auth().await
    }

    pub fn login(&self) {
        self.controller.login()
    }

    pub async fn logout(&self) {
        self.controller.logout().await
    }

    pub async fn refresh_user(&self) {
        self.controller.refresh_user().await
    }
}

/// Owner of the controller for the lifetime of the application.
/// Dropping it aborts the startup probe if it is still running.
pub struct AuthProvider {
    context: AuthContext,
    startup_probe: JoinHandle<()>,
}

impl AuthProvider {
    /// Build the controller and dispatch its one startup `check_auth`.
    /// Must be called from within a tokio runtime.
    pub fn mount(gateway: Arc<dyn IdentityGateway>) -> Self {
        let controller = Arc::new(AuthController::new(gateway));
        let startup_probe = tokio::spawn({
            let controller = controller.clone();
            async move { controller.check_auth().await }
        });
        debug!("Auth provider mounted, startup probe dispatched");
        AuthProvider {
            context: AuthContext { controller },
            startup_probe,
        }
    }

    pub fn context(&self) -> AuthContext {
        self.context.clone()
    }
}

impl Drop for AuthProvider {
    fn drop(&mut self) {
        if !self.startup_probe.is_finished() {
            debug!("Auth provider unmounted before startup probe finished; aborting it");
            self.startup_probe.abort();
        }
    }
}
