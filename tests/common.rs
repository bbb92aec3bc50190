use std::sync::{Arc, Mutex};
use std::time::Duration;

use chronotes_auth::auth::AuthProvider;
use chronotes_auth::config::GatewayConfig;
use chronotes_auth::gateway::HttpIdentityGateway;
use chronotes_auth::navigator::Navigator;
use tokio::net::TcpListener;

/// Remembers every URL it was asked to navigate to.
#[derive(Default)]
pub struct RecordingNavigator {
    pub visited: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn get_name(&self) -> &str {
        "recording"
    }

    fn navigate(&self, url: &str) {
        self.visited.lock().unwrap().push(url.to_string());
    }
}

pub fn gateway_config(base_url: &str, timeout: Duration) -> GatewayConfig {
    GatewayConfig {
        timeout_in_ms: timeout.as_millis() as u64,
        ..GatewayConfig::with_base_url(base_url)
    }
}

/// Mount a provider talking HTTP to `base_url`.
pub fn mount(base_url: &str, timeout: Duration) -> (AuthProvider, Arc<RecordingNavigator>) {
    let navigator = Arc::new(RecordingNavigator::default());
    let gateway = HttpIdentityGateway::new(&gateway_config(base_url, timeout), navigator.clone())
        .expect("gateway should build");
    (AuthProvider::mount(Arc::new(gateway)), navigator)
}

/// Accepts connections and never answers them.
pub async fn silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind");
    let addr = listener.local_addr().expect("no local addr");
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}", addr)
}

pub const ANN_PROFILE: &str = r#"{"data": {"name": "Ann", "email": "a@x.com"}}"#;
