//! Error types shared by every cloud provider.

use std::fmt;

use thiserror::Error;

/// Result type alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors surfaced by provider construction and provider operations.
///
/// Nothing is retried or recovered inside a provider: each variant is
/// handed back to the caller, which owns retry and backoff policy.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Missing, empty, or invalid configuration. Fatal at construction.
    #[error("config error: {0}")]
    Config(String),

    /// The remote call did not complete successfully.
    #[error("{op} {url}: {source}")]
    Transport {
        op: &'static str,
        url: String,
        #[source]
        source: TransportError,
    },

    /// The remote answered, but the body was not the expected JSON shape.
    #[error("{op} {url}: malformed response: {source}")]
    Decode {
        op: &'static str,
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The request payload could not be serialized.
    #[error("{op}: failed to encode request: {source}")]
    Encode {
        op: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A caller-supplied value cannot be used as a path segment.
    #[error("{op}: invalid argument: {message}")]
    InvalidArgument { op: &'static str, message: String },

    #[error("unknown cloud provider: {0}")]
    UnknownProvider(String),

    #[error("cloud provider already registered: {0}")]
    DuplicateProvider(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`ProviderError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Transport(TransportErrorKind),
    Decode,
    Encode,
    InvalidArgument,
    Registry,
    Io,
}

impl ProviderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Transport { source, .. } => ErrorKind::Transport(source.kind()),
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Encode { .. } => ErrorKind::Encode,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::UnknownProvider(_) | Self::DuplicateProvider(_) => ErrorKind::Registry,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Whether the remote could not be reached or did not answer in time.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub fn is_timeout(&self) -> bool {
        self.kind() == ErrorKind::Transport(TransportErrorKind::Timeout)
    }
}

/// What went wrong on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection could not be established or was dropped mid-exchange.
    Connect,
    /// The call exceeded the transport deadline.
    Timeout,
    /// The remote answered with a non-2xx status.
    Status(u16),
    /// The request itself could not be built.
    Request,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => f.write_str("connection failed"),
            Self::Timeout => f.write_str("timed out"),
            Self::Status(code) => write!(f, "status {code}"),
            Self::Request => f.write_str("invalid request"),
        }
    }
}

/// Failure of a single request/response exchange.
#[derive(Debug, Clone, Error)]
#[error("transport error ({kind}): {message}")]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connect, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, message)
    }

    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Status(code), message)
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_and_decode_kinds_are_distinct() {
        let transport = ProviderError::Transport {
            op: "list",
            url: "http://h/v1/instances".to_string(),
            source: TransportError::timeout("deadline 5s elapsed"),
        };
        let decode = ProviderError::Decode {
            op: "list",
            url: "http://h/v1/instances".to_string(),
            source: serde_json::from_str::<Vec<String>>("{").unwrap_err(),
        };

        assert!(transport.is_transport());
        assert!(transport.is_timeout());
        assert!(!decode.is_transport());
        assert_eq!(decode.kind(), ErrorKind::Decode);
    }

    #[test]
    fn transport_error_message_names_operation_and_url() {
        let err = ProviderError::Transport {
            op: "bind",
            url: "http://sched/v1/scheduler/bind".to_string(),
            source: TransportError::status(503, "service unavailable"),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("bind http://sched/v1/scheduler/bind"));
        assert!(msg.contains("status 503"));
        assert_eq!(err.kind(), ErrorKind::Transport(TransportErrorKind::Status(503)));
    }
}
