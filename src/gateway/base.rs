use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::models::User;
use crate::navigator::Navigator;

use super::error::GatewayError;
use super::http_gateway::HttpIdentityGateway;

/// The calls the session controller makes against the identity service.
#[async_trait::async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Who is logged in, if anyone.
    async fn fetch_current_user(&self) -> Result<Option<User>, GatewayError>;

    /// Where the provider login flow starts.
    fn login_url(&self) -> String;

    /// Navigate away to the provider login. Nothing is awaited.
    fn redirect_to_login(&self);

    /// End the current session on the service side.
    async fn logout(&self) -> Result<(), GatewayError>;
}

/// Create the HTTP identity gateway from a given config.
pub fn create_gateway(
    config: &GatewayConfig,
    navigator: Arc<dyn Navigator>,
) -> Result<Arc<dyn IdentityGateway>, GatewayError> {
    Ok(Arc::new(HttpIdentityGateway::new(config, navigator)?))
}
