//! The identity service boundary: three HTTP calls the session controller depends on.

pub mod base;
pub mod error;
pub mod http_gateway;

pub use base::{create_gateway, IdentityGateway};
pub use error::{GatewayError, GatewayErrorKind};
pub use http_gateway::{HttpIdentityGateway, RequestOptions};
