pub mod session;
pub mod user;

pub use session::{SessionPhase, SessionState};
pub use user::{User, UserResponse};
