//! Transport layer error types.
//!
//! No transport error escapes the bridge: a fatal error tears the affected
//! socket down and the bridge keeps ticking.

use std::io;

use thiserror::Error;

use crate::core::CodecError;

/// Transport layer errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Could not bind the receive socket.
    #[error("bind to port {port} failed: {source}")]
    Bind {
        /// Requested port.
        port: u16,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Destination host did not resolve to any address.
    #[error("could not resolve {host}:{port}")]
    Resolve {
        /// Destination host.
        host: String,
        /// Destination port.
        port: u16,
    },

    /// Could not open or connect the send socket.
    #[error("connect to {host}:{port} failed: {source}")]
    Connect {
        /// Destination host.
        host: String,
        /// Destination port.
        port: u16,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Socket send or receive failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// Packet could not be encoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// No runtime is available to drive the socket.
    #[error("no tokio runtime available")]
    NoRuntime,
}

impl TransportError {
    /// Check if this error tears the socket down.
    ///
    /// A full kernel send buffer only costs the current datagram.
    pub fn is_fatal(&self) -> bool {
        match self {
            TransportError::Io(e) => e.kind() != io::ErrorKind::WouldBlock,
            _ => true,
        }
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_would_block_is_not_fatal() {
        let err = TransportError::Io(io::Error::new(io::ErrorKind::WouldBlock, "full"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_fatal_errors() {
        assert!(TransportError::Io(io::Error::other("boom")).is_fatal());
        assert!(TransportError::Codec(CodecError::Encode("x".into())).is_fatal());
        assert!(
            TransportError::Resolve {
                host: "nowhere".into(),
                port: 1
            }
            .is_fatal()
        );
        assert!(TransportError::NoRuntime.is_fatal());
    }

    #[test]
    fn test_bind_error_message() {
        let err = TransportError::Bind {
            port: 39539,
            source: io::Error::new(io::ErrorKind::AddrInUse, "in use"),
        };
        assert_eq!(err.to_string(), "bind to port 39539 failed: in use");
    }
}
