//! Application startup: the composition root.
//!
//! Builds the navigator, the identity gateway and the auth provider from the
//! configuration, then hands the shared state to the selected command.

use std::io::IsTerminal;
use std::sync::Arc;
use tracing::info;

use crate::auth::AuthProvider;
use crate::commands::{self, Command};
use crate::config::ConfigV1;
use crate::gateway::{create_gateway, GatewayError};
use crate::navigator::create_navigator;
use crate::state::AppState;

/// The mounted application. Keeps the provider alive for as long as the
/// state is in use; dropping it tears the session controller down.
pub struct App {
    pub state: AppState,
    _provider: AuthProvider,
}

/// Wires everything together and dispatches the startup session probe.
/// Must be called from within a tokio runtime.
///
/// # Errors
///
/// Returns an error if the gateway cannot be built from the configuration.
pub fn mount(config: Arc<ConfigV1>) -> Result<App, GatewayError> {
    let navigator = create_navigator(&config.navigator);
    let gateway = create_gateway(&config.gateway, navigator)?;
    let provider = AuthProvider::mount(gateway);

    info!("Mounted session controller against {}", config.gateway.base_url);

    let state = AppState {
        config: config.clone(),
        auth: provider.context(),
    };
    Ok(App {
        state,
        _provider: provider,
    })
}

/// Initializes the application and runs one command to completion.
///
/// # Errors
///
/// Returns an error if the application cannot be mounted or the command
/// output cannot be written.
pub async fn run(config: Arc<ConfigV1>, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    let app = mount(config)?;
    let mut stdout = std::io::stdout();
    let color = stdout.is_terminal();
    commands::execute(&app.state, command, &mut stdout, color).await?;
    Ok(())
}
