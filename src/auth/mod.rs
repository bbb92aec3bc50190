pub mod context;
pub mod controller;

// Re-export so we can do "use crate::auth::*;"
pub use context::{AuthContext, AuthProvider};
pub use controller::AuthController;
