use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde_json::{json, Value};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::{EndpointsConfig, GatewayConfig};
use crate::models::{User, UserResponse};
use crate::navigator::Navigator;

use super::base::IdentityGateway;
use super::error::GatewayError;

/// Per-call overrides of the gateway defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestOptions {
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        RequestOptions {
            timeout: Some(timeout),
        }
    }
}

/// Talks JSON to the identity service, carrying the session cookie along.
pub struct HttpIdentityGateway {
    client: reqwest::Client,
    base_url: String,
    endpoints: EndpointsConfig,
    timeout: Duration,
    navigator: Arc<dyn Navigator>,
}

impl HttpIdentityGateway {
    pub fn new(
        config: &GatewayConfig,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, GatewayError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let origin = Url::parse(&base_url).map_err(|e| {
            GatewayError::invalid_config(format!("invalid gateway base_url '{}': {}", base_url, e))
        })?;

        // Cookies set by the service are kept for the lifetime of the client.
        let jar = Jar::default();
        if let Some(cookie) = &config.session_cookie {
            jar.add_cookie_str(cookie, &origin);
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_provider(Arc::new(jar))
            .build()
            .map_err(|e| GatewayError::invalid_config(format!("Error building client: {}", e)))?;

        info!(
            "Creating identity gateway for '{}' (timeout {} ms, navigator '{}')",
            base_url,
            config.timeout_in_ms,
            navigator.get_name()
        );

        Ok(HttpIdentityGateway {
            client,
            base_url,
            endpoints: config.endpoints.clone(),
            timeout: config.timeout(),
            navigator,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends one request and returns the body of a 2xx response.
    ///
    /// The deadline covers both the response head and the body; when it
    /// elapses the request future is dropped, which aborts the exchange.
    async fn send(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Vec<u8>, GatewayError> {
        let url = self.url(path);
        let deadline = options.timeout.unwrap_or(self.timeout);
        debug!("Sending {} request to: {}", method, url);

        let exchange = async {
            let response = self.client.request(method.clone(), &url).send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<(StatusCode, Vec<u8>), reqwest::Error>((status, body.to_vec()))
        };

        let (status, body) = match timeout(deadline, exchange).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    event_name = "gateway.request.timeout",
                    event_domain = "gateway",
                    method = %method,
                    url = url.as_str(),
                    timeout_ms = deadline.as_millis() as u64,
                    "identity request timed out"
                );
                return Err(GatewayError::timeout());
            }
        };

        if !status.is_success() {
            let details: Value = serde_json::from_slice(&body).unwrap_or_else(|_| json!({}));
            debug!("{} {} answered with status {}", method, url, status);
            return Err(GatewayError::from_status(status.as_u16(), details));
        }

        Ok(body)
    }

    pub async fn fetch_current_user_with(
        &self,
        options: RequestOptions,
    ) -> Result<Option<User>, GatewayError> {
        let body = self
            .send(Method::GET, &self.endpoints.profile, options)
            .await?;
        let response: UserResponse = serde_json::from_slice(&body)
            .map_err(|e| GatewayError::decode(format!("Error parsing JSON: {}", e)))?;
        Ok(response.data)
    }

    /// The service answers logout with an empty body; whatever it sends is ignored.
    pub async fn logout_with(&self, options: RequestOptions) -> Result<(), GatewayError> {
        self.send(Method::POST, &self.endpoints.logout, options)
            .await
            .map(|_| ())
    }
}

#[async_trait::async_trait]
impl IdentityGateway for HttpIdentityGateway {
    async fn fetch_current_user(&self) -> Result<Option<User>, GatewayError> {
        self.fetch_current_user_with(RequestOptions::default()).await
    }

    fn login_url(&self) -> String {
        self.url(&self.endpoints.login)
    }

    fn redirect_to_login(&self) {
        self.navigator.navigate(&self.login_url());
    }

    async fn logout(&self) -> Result<(), GatewayError> {
        self.logout_with(RequestOptions::default()).await
    }
}
