use std::fmt;

/// Error type for remote API operations.
#[derive(Debug)]
pub enum ClientError {
    /// Network-level failure (connect, timeout, TLS).
    Network(String),
    /// Non-2xx response with status code and upstream message.
    Http(u16, String),
    /// Response body did not have the expected shape.
    Parse(String),
    /// The platform rejected the recipient export job request.
    ExportRejected(String),
}

impl ClientError {
    /// Whether the upstream rejected our credentials.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Http(401, _) | Self::Http(403, _))
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Http(code, msg) => write!(f, "HTTP {code}: {msg}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::ExportRejected(msg) => write!(f, "export request rejected: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}
