use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::gateway::{GatewayError, IdentityGateway};
use crate::models::{SessionState, User};

/// Single source of truth for "is someone logged in, and who".
///
/// The state is published through a watch channel: consumers get snapshots
/// and change notifications, only the controller can write.
///
/// Probes resolve in completion order and the last one to resolve wins,
/// even if a newer probe was dispatched after it. Such stale writes are
/// still applied but are reported with a warning.
pub struct AuthController {
    gateway: Arc<dyn IdentityGateway>,
    state: watch::Sender<SessionState>,
    probes_dispatched: AtomicU64,
}

/// What a probe learned from the gateway.
enum ProbeOutcome {
    User(User),
    NoUser,
    Failed(GatewayError),
}

impl From<Result<Option<User>, GatewayError>> for ProbeOutcome {
    fn from(result: Result<Option<User>, GatewayError>) -> Self {
        match result {
            Ok(Some(user)) => ProbeOutcome::User(user),
            Ok(None) => ProbeOutcome::NoUser,
            Err(e) => ProbeOutcome::Failed(e),
        }
    }
}

impl AuthController {
    /// A controller in the initial probing state. No request is made until
    /// `check_auth` is called; `AuthProvider` does that once on mount.
    pub fn new(gateway: Arc<dyn IdentityGateway>) -> Self {
        let (state, _) = watch::channel(SessionState::probing());
        AuthController {
            gateway,
            state,
            probes_dispatched: AtomicU64::new(0),
        }
    }

    /// Latest published state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn login_url(&self) -> String {
        self.gateway.login_url()
    }

    /// Probe the session. Never fails: anything but a user payload ends in
    /// the unauthenticated state.
    pub async fn check_auth(&self) {
        let probe = self.begin_probe();
        self.publish(|state| {
            state.is_loading = true;
        });

        let outcome = ProbeOutcome::from(self.gateway.fetch_current_user().await);
        self.finish_probe(probe, "check_auth");

        let next = match outcome {
            ProbeOutcome::User(user) => {
                debug!(
                    event_name = "auth.check.authenticated",
                    event_domain = "auth",
                    probe,
                    "session check found a user"
                );
                SessionState::authenticated(user)
            }
            ProbeOutcome::NoUser => {
                debug!("Session probe {} returned no user", probe);
                SessionState::unauthenticated()
            }
            ProbeOutcome::Failed(e) => {
                debug!(
                    event_name = "auth.check.failed",
                    event_domain = "auth",
                    probe,
                    code = ?e.code,
                    "session probe failed: {}",
                    e
                );
                SessionState::unauthenticated()
            }
        };
        self.publish(|state| *state = next);
    }

    /// Hand the client over to the identity provider. The state is left
    /// alone; the next `check_auth` after the user returns observes the result.
    pub fn login(&self) {
        info!(
            event_name = "auth.login.redirect",
            event_domain = "auth",
            "redirecting to identity provider login"
        );
        self.gateway.redirect_to_login();
    }

    /// End the session. On failure the error is logged and the state kept.
    pub async fn logout(&self) {
        match self.gateway.logout().await {
            Ok(()) => {
                info!(
                    event_name = "auth.logout.succeeded",
                    event_domain = "auth",
                    "logged out"
                );
                self.publish(|state| *state = SessionState::unauthenticated());
            }
            Err(e) => {
                error!(
                    event_name = "auth.logout.failed",
                    event_domain = "auth",
                    code = ?e.code,
                    details = ?e.details,
                    "Logout error: {}",
                    e
                );
            }
        }
    }

    /// Re-validate the session without touching `is_loading`.
    pub async fn refresh_user(&self) {
        let probe = self.begin_probe();
        let outcome = ProbeOutcome::from(self.gateway.fetch_current_user().await);
        self.finish_probe(probe, "refresh_user");

        match outcome {
            ProbeOutcome::User(user) => self.publish(|state| {
                state.user = Some(user);
                state.is_authenticated = true;
            }),
            ProbeOutcome::NoUser => {
                debug!("Refresh {} returned no user", probe);
                self.publish(Self::clear_user);
            }
            ProbeOutcome::Failed(e) => {
                debug!(
                    event_name = "auth.refresh.failed",
                    event_domain = "auth",
                    probe,
                    code = ?e.code,
                    "session refresh failed: {}",
                    e
                );
                self.publish(Self::clear_user);
            }
        }
    }

    fn clear_user(state: &mut SessionState) {
        state.user = None;
        state.is_authenticated = false;
    }

    fn begin_probe(&self) -> u64 {
        self.probes_dispatched.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn finish_probe(&self, probe: u64, action: &str) {
        let latest = self.probes_dispatched.load(Ordering::SeqCst);
        if probe < latest {
            warn!(
                event_name = "auth.probe.stale",
                event_domain = "auth",
                probe,
                latest,
                action,
                "applying result of a probe superseded by a newer one"
            );
        }
    }

    /// Apply a transition, notifying subscribers only if the state changed.
    fn publish(&self, transition: impl FnOnce(&mut SessionState)) {
        self.state.send_if_modified(|state| {
            let before = state.clone();
            transition(state);
            *state != before
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionPhase;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::oneshot;

    type Reply = Result<Option<User>, GatewayError>;

    /// Gateway stub answering from scripted queues.
    #[derive(Default)]
    struct ScriptedGateway {
        profiles: Mutex<VecDeque<Reply>>,
        logouts: Mutex<VecDeque<Result<(), GatewayError>>>,
        redirects: Mutex<u32>,
    }

    impl ScriptedGateway {
        fn with_profiles(replies: Vec<Reply>) -> Self {
            ScriptedGateway {
                profiles: Mutex::new(replies.into()),
                ..Default::default()
            }
        }

        fn push_logout(&self, reply: Result<(), GatewayError>) {
            self.logouts.lock().unwrap().push_back(reply);
        }
    }

    #[async_trait::async_trait]
    impl IdentityGateway for ScriptedGateway {
        async fn fetch_current_user(&self) -> Result<Option<User>, GatewayError> {
            let reply = self.profiles.lock().unwrap().pop_front();
            reply.expect("unexpected profile request")
        }

        fn login_url(&self) -> String {
            "/v1/auth/google/login".to_string()
        }

        fn redirect_to_login(&self) {
            *self.redirects.lock().unwrap() += 1;
        }

        async fn logout(&self) -> Result<(), GatewayError> {
            let reply = self.logouts.lock().unwrap().pop_front();
            reply.expect("unexpected logout request")
        }
    }

    /// Answers the first profile request right away, then blocks the
    /// second one until released and fails it.
    struct GatedGateway {
        first: Mutex<Option<Reply>>,
        gate: Mutex<Option<oneshot::Receiver<()>>>,
    }

    #[async_trait::async_trait]
    impl IdentityGateway for GatedGateway {
        async fn fetch_current_user(&self) -> Result<Option<User>, GatewayError> {
            let first = self.first.lock().unwrap().take();
            if let Some(reply) = first {
                return reply;
            }
            let gate = self.gate.lock().unwrap().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            Err(GatewayError::from_status(401, serde_json::json!({})))
        }

        fn login_url(&self) -> String {
            String::new()
        }

        fn redirect_to_login(&self) {}

        async fn logout(&self) -> Result<(), GatewayError> {
            Ok(())
        }
    }

    /// The first request fails after a delay, later ones succeed at once.
    struct SlowFirstGateway {
        calls: AtomicU64,
    }

    #[async_trait::async_trait]
    impl IdentityGateway for SlowFirstGateway {
        async fn fetch_current_user(&self) -> Result<Option<User>, GatewayError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(100)).await;
                return Err(GatewayError::timeout());
            }
            Ok(Some(User::new("Ann", "a@x.com")))
        }

        fn login_url(&self) -> String {
            String::new()
        }

        fn redirect_to_login(&self) {}

        async fn logout(&self) -> Result<(), GatewayError> {
            Ok(())
        }
    }

    fn ann() -> User {
        User::new("Ann", "a@x.com")
    }

    async fn authenticated_controller(gateway: Arc<ScriptedGateway>) -> AuthController {
        let controller = AuthController::new(gateway);
        controller.check_auth().await;
        assert_eq!(controller.state().phase(), SessionPhase::Authenticated);
        controller
    }

    #[test]
    fn test_new_controller_is_probing() {
        let controller = AuthController::new(Arc::new(ScriptedGateway::default()));
        assert_eq!(controller.state(), SessionState::probing());
    }

    #[tokio::test]
    async fn test_check_auth_with_user() {
        let gateway = Arc::new(ScriptedGateway::with_profiles(vec![Ok(Some(ann()))]));
        let controller = AuthController::new(gateway);
        controller.check_auth().await;
        assert_eq!(controller.state(), SessionState::authenticated(ann()));
    }

    #[tokio::test]
    async fn test_check_auth_without_user() {
        let gateway = Arc::new(ScriptedGateway::with_profiles(vec![Ok(None)]));
        let controller = AuthController::new(gateway);
        controller.check_auth().await;
        assert_eq!(controller.state(), SessionState::unauthenticated());
    }

    #[tokio::test]
    async fn test_check_auth_failure_fails_closed() {
        let gateway = Arc::new(ScriptedGateway::with_profiles(vec![Err(
            GatewayError::network("connection refused"),
        )]));
        let controller = AuthController::new(gateway);
        controller.check_auth().await;
        assert_eq!(controller.state(), SessionState::unauthenticated());
    }

    #[tokio::test]
    async fn test_check_auth_timeout_fails_closed() {
        let gateway = Arc::new(ScriptedGateway::with_profiles(vec![Err(
            GatewayError::timeout(),
        )]));
        let controller = AuthController::new(gateway);
        controller.check_auth().await;
        assert_eq!(controller.state(), SessionState::unauthenticated());
    }

    #[tokio::test]
    async fn test_recheck_keeps_last_known_values_while_loading() {
        let (release, wait) = oneshot::channel::<()>();
        let gateway = Arc::new(GatedGateway {
            first: Mutex::new(Some(Ok(Some(ann())))),
            gate: Mutex::new(Some(wait)),
        });
        let controller = Arc::new(AuthController::new(gateway));
        controller.check_auth().await;

        let mut rx = controller.subscribe();
        let probing = tokio::spawn({
            let controller = controller.clone();
            async move { controller.check_auth().await }
        });
        rx.wait_for(|s| s.is_loading).await.unwrap();

        let during = controller.state();
        assert!(during.is_authenticated);
        assert_eq!(during.user, Some(ann()));

        release.send(()).unwrap();
        probing.await.unwrap();
        assert_eq!(controller.state(), SessionState::unauthenticated());
    }

    #[tokio::test]
    async fn test_login_redirects_without_touching_state() {
        let gateway = Arc::new(ScriptedGateway::with_profiles(vec![Ok(None)]));
        let controller = AuthController::new(gateway.clone());
        controller.check_auth().await;

        controller.login();
        assert_eq!(*gateway.redirects.lock().unwrap(), 1);
        assert_eq!(controller.state(), SessionState::unauthenticated());
    }

    #[tokio::test]
    async fn test_logout_success() {
        let gateway = Arc::new(ScriptedGateway::with_profiles(vec![Ok(Some(ann()))]));
        gateway.push_logout(Ok(()));
        let controller = authenticated_controller(gateway).await;

        controller.logout().await;
        assert_eq!(controller.state(), SessionState::unauthenticated());
    }

    #[tokio::test]
    async fn test_logout_failure_keeps_state() {
        let gateway = Arc::new(ScriptedGateway::with_profiles(vec![Ok(Some(ann()))]));
        gateway.push_logout(Err(GatewayError::from_status(
            500,
            serde_json::json!({}),
        )));
        let controller = authenticated_controller(gateway).await;

        controller.logout().await;
        assert_eq!(controller.state(), SessionState::authenticated(ann()));
    }

    #[tokio::test]
    async fn test_refresh_failure_clears_user() {
        let gateway = Arc::new(ScriptedGateway::with_profiles(vec![
            Ok(Some(ann())),
            Err(GatewayError::from_status(401, serde_json::json!({}))),
        ]));
        let controller = authenticated_controller(gateway).await;

        controller.refresh_user().await;
        assert_eq!(controller.state(), SessionState::unauthenticated());
    }

    #[tokio::test]
    async fn test_refresh_without_user_clears_user() {
        let gateway = Arc::new(ScriptedGateway::with_profiles(vec![Ok(Some(ann())), Ok(None)]));
        let controller = authenticated_controller(gateway).await;

        controller.refresh_user().await;
        let state = controller.state();
        assert!(!state.is_authenticated);
        assert!(state.user.is_none());
    }

    #[tokio::test]
    async fn test_refresh_does_not_touch_loading_flag() {
        let gateway = Arc::new(ScriptedGateway::with_profiles(vec![Ok(Some(ann()))]));
        let controller = AuthController::new(gateway);

        controller.refresh_user().await;
        let state = controller.state();
        assert!(state.is_loading);
        assert!(state.is_authenticated);
        assert_eq!(state.user, Some(ann()));
    }

    #[tokio::test]
    async fn test_refresh_picks_up_profile_changes() {
        let renamed = User::new("Ann B", "a@x.com").with_id("7");
        let gateway = Arc::new(ScriptedGateway::with_profiles(vec![
            Ok(Some(ann())),
            Ok(Some(renamed.clone())),
        ]));
        let controller = authenticated_controller(gateway).await;

        controller.refresh_user().await;
        assert_eq!(controller.state(), SessionState::authenticated(renamed));
    }

    #[tokio::test]
    async fn test_identical_refreshes_publish_no_change() {
        let gateway = Arc::new(ScriptedGateway::with_profiles(vec![
            Ok(Some(ann())),
            Ok(Some(ann())),
            Ok(Some(ann())),
        ]));
        let controller = authenticated_controller(gateway).await;
        let rx = controller.subscribe();

        controller.refresh_user().await;
        let after_first = controller.state();
        controller.refresh_user().await;

        assert_eq!(controller.state(), after_first);
        assert!(!rx.has_changed().unwrap());
    }

    /// Documents the current ordering: a probe resolving after a newer one
    /// still overwrites the state.
    #[tokio::test]
    async fn test_last_resolved_probe_wins() {
        let gateway = Arc::new(SlowFirstGateway {
            calls: AtomicU64::new(0),
        });
        let controller = Arc::new(AuthController::new(gateway));

        let slow_check = tokio::spawn({
            let controller = controller.clone();
            async move { controller.check_auth().await }
        });
        // Let the slow probe dispatch first.
        tokio::time::sleep(Duration::from_millis(10)).await;
        controller.refresh_user().await;
        assert!(controller.state().is_authenticated);

        slow_check.await.unwrap();
        let state = controller.state();
        assert!(!state.is_authenticated);
        assert!(state.user.is_none());
    }
}
