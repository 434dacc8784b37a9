//! Error types shared across the bridge.

use thiserror::Error;

/// Errors from the OSC wire codec.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Packet could not be serialized.
    #[error("encode failed: {0}")]
    Encode(String),

    /// Datagram is not a valid OSC packet.
    #[error("decode failed: {0}")]
    Decode(String),
}

/// Errors raised while parsing the arguments of a recognized inbound message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Fewer arguments than the message shape requires.
    #[error("{address}: expected {expected} arguments, got {actual}")]
    MissingArguments {
        /// Message address.
        address: String,
        /// Required argument count.
        expected: usize,
        /// Received argument count.
        actual: usize,
    },

    /// An argument has the wrong OSC type.
    #[error("{address}: argument {index} is not a {expected}")]
    ArgumentType {
        /// Message address.
        address: String,
        /// Zero-based argument index.
        index: usize,
        /// Expected OSC type name.
        expected: &'static str,
    },
}

/// Errors from the outbound motion encoder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Streaming requested before the body was measured.
    #[error("skeleton has not been measured yet")]
    NotCalibrated,
}

/// Errors in the settings layer.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Settings file could not be read or written.
    #[error("settings i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid JSON.
    #[error("settings json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Port text is not a valid port number.
    #[error("invalid port: {0:?}")]
    InvalidPort(String),

    /// Edited field does not exist.
    #[error("unknown settings field: {0}")]
    UnknownField(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_error_messages() {
        let err = DispatchError::MissingArguments {
            address: "/VMC/Ext/Bone/Pos".into(),
            expected: 8,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "/VMC/Ext/Bone/Pos: expected 8 arguments, got 3"
        );

        let err = DispatchError::ArgumentType {
            address: "/VMC/Ext/Root/Pos".into(),
            index: 0,
            expected: "string",
        };
        assert_eq!(err.to_string(), "/VMC/Ext/Root/Pos: argument 0 is not a string");
    }

    #[test]
    fn test_config_error_from_json() {
        let json_err = serde_json::from_str::<u16>("nope").unwrap_err();
        let err: ConfigError = json_err.into();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
