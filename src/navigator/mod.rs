//! Full-page navigation away from the client, used for login redirects.
//!
//! A redirect has no result the caller can wait for: its outcome is only
//! observed by the next session probe after the user comes back.

mod browser;
mod print;

use std::sync::Arc;

pub use browser::BrowserNavigator;
pub use print::PrintNavigator;

use crate::config::NavigatorConfig;

/// Fire-and-forget navigation. Implementations log their failures; they never return them.
pub trait Navigator: Send + Sync {
    fn get_name(&self) -> &str;
    fn navigate(&self, url: &str);
}

/// Create a navigator from a given config.
pub fn create_navigator(config: &NavigatorConfig) -> Arc<dyn Navigator> {
    match config {
        NavigatorConfig::Browser => Arc::new(BrowserNavigator::new()),
        NavigatorConfig::Print => Arc::new(PrintNavigator::new()),
    }
}
