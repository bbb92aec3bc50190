use serde_json::Value;

/// HTTP status reported for a request the client gave up on.
pub const TIMEOUT_STATUS: u16 = 408;

/// What went wrong while talking to the identity service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    /// The service answered with a non-2xx status.
    Status,
    /// The request never completed (connection refused, DNS, reset, ...).
    Network,
    /// The client-side deadline elapsed and the request was cancelled.
    Timeout,
    /// A 2xx response whose body could not be understood.
    Decode,
    /// The gateway could not be built from its configuration.
    InvalidConfig,
}

/// A normalized gateway failure: a message, an optional status code and
/// the optional structured body the service sent along.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct GatewayError {
    pub message: String,
    pub code: Option<u16>,
    pub details: Option<Value>,
    pub kind: GatewayErrorKind,
}

impl GatewayError {
    /// An error built from a non-2xx response. The service's own `message`
    /// field wins over the generic text when present.
    pub fn from_status(status: u16, body: Value) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP error! status: {}", status));
        GatewayError {
            message,
            code: Some(status),
            details: Some(body),
            kind: GatewayErrorKind::Status,
        }
    }

    pub fn timeout() -> Self {
        GatewayError {
            message: "Request timeout".to_string(),
            code: Some(TIMEOUT_STATUS),
            details: None,
            kind: GatewayErrorKind::Timeout,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        GatewayError {
            message: message.into(),
            code: None,
            details: None,
            kind: GatewayErrorKind::Network,
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        GatewayError {
            message: message.into(),
            code: None,
            details: None,
            kind: GatewayErrorKind::Decode,
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        GatewayError {
            message: message.into(),
            code: None,
            details: None,
            kind: GatewayErrorKind::InvalidConfig,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == GatewayErrorKind::Timeout
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::timeout()
        } else if e.is_decode() {
            GatewayError::decode(format!("Error parsing JSON: {}", e))
        } else {
            GatewayError::network(e.to_string())
        }
    }
}
