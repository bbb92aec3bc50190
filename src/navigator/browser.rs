use tracing::{info, warn};

use super::Navigator;

/// Opens URLs in the system browser, printing them when no browser can be launched.
#[derive(Debug, Default)]
pub struct BrowserNavigator;

impl BrowserNavigator {
    pub fn new() -> Self {
        BrowserNavigator
    }
}

impl Navigator for BrowserNavigator {
    fn get_name(&self) -> &str {
        "browser"
    }

    fn navigate(&self, url: &str) {
        match open::that_detached(url) {
            Ok(()) => info!(
                event_name = "navigator.browser.opened",
                event_domain = "navigator",
                url,
                "opened login page in browser"
            ),
            Err(e) => {
                warn!(
                    event_name = "navigator.browser.failed",
                    event_domain = "navigator",
                    url,
                    error = %e,
                    "could not open browser"
                );
                eprintln!("Open this URL to continue: {}", url);
            }
        }
    }
}
