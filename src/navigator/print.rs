use tracing::debug;

use super::Navigator;

/// Prints the target URL to stderr for the user to follow by hand.
#[derive(Debug, Default)]
pub struct PrintNavigator;

impl PrintNavigator {
    pub fn new() -> Self {
        PrintNavigator
    }
}

impl Navigator for PrintNavigator {
    fn get_name(&self) -> &str {
        "print"
    }

    fn navigate(&self, url: &str) {
        debug!("Printing navigation target {}", url);
        eprintln!("Open this URL to continue: {}", url);
    }
}
