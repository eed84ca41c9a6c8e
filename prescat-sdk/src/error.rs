//! Error taxonomy shared by every client call.
//!
//! Callers branch on the variant (or on [`ClientError::kind`]), never on the
//! message text. The message is a human-readable diagnostic that already
//! names the operation, the subject, the status, the request URL and the
//! response body.

/// The closed set of failure kinds a call can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The client was used before it was configured, or was configured
    /// with unusable values.
    Configuration,
    /// The catalog could not be reached at all (DNS, TLS, timeout, refused).
    ConnectionFailed,
    /// 404 Not Found.
    NotFound,
    /// 423 Locked.
    Locked,
    /// 409 Conflict.
    Conflict,
    /// Any other non-2xx response, or a body that could not be decoded.
    UnexpectedResponse,
}

/// Errors produced by the Preservation Catalog clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    ConnectionFailed(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Locked(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    UnexpectedResponse(String),
}

impl ClientError {
    /// Build the error of the given kind carrying `message`.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::Configuration => ClientError::Configuration(message),
            ErrorKind::ConnectionFailed => ClientError::ConnectionFailed(message),
            ErrorKind::NotFound => ClientError::NotFound(message),
            ErrorKind::Locked => ClientError::Locked(message),
            ErrorKind::Conflict => ClientError::Conflict(message),
            ErrorKind::UnexpectedResponse => ClientError::UnexpectedResponse(message),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Configuration(_) => ErrorKind::Configuration,
            ClientError::ConnectionFailed(_) => ErrorKind::ConnectionFailed,
            ClientError::NotFound(_) => ErrorKind::NotFound,
            ClientError::Locked(_) => ErrorKind::Locked,
            ClientError::Conflict(_) => ErrorKind::Conflict,
            ClientError::UnexpectedResponse(_) => ErrorKind::UnexpectedResponse,
        }
    }

    /// The formatted diagnostic message.
    pub fn message(&self) -> &str {
        match self {
            ClientError::Configuration(m)
            | ClientError::ConnectionFailed(m)
            | ClientError::NotFound(m)
            | ClientError::Locked(m)
            | ClientError::Conflict(m)
            | ClientError::UnexpectedResponse(m) => m,
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(e: url::ParseError) -> Self {
        ClientError::Configuration(format!("invalid url: {e}"))
    }
}
