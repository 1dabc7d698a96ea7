//! Error types for update-dns
//!
//! Every failure is terminal for the invocation. The variants map one-to-one
//! onto the categories the binary turns into exit codes.

use thiserror::Error;

/// Result type alias for update-dns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for update-dns
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing server, key name, secret or record name)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Record text does not match the syntax of its declared type
    #[error("Unable to parse record: {0}")]
    Parse(String),

    /// SOA lookup failed or returned no SOA record
    #[error("Unable to discover zone: {0}")]
    ZoneDiscovery(String),

    /// Network exchange with the server failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered the update with a non-success response code
    #[error("Server refused registration. Code: {rcode}")]
    Rejected {
        /// Response code mnemonic, e.g. `REFUSED`
        rcode: String,
    },

    /// TSIG key could not be constructed
    #[error("TSIG key error: {0}")]
    Tsig(String),

    /// I/O errors (address resolution, config file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON configuration errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a record parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a zone discovery error
    pub fn zone_discovery(msg: impl Into<String>) -> Self {
        Self::ZoneDiscovery(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a rejection error from a response code mnemonic
    pub fn rejected(rcode: impl Into<String>) -> Self {
        Self::Rejected {
            rcode: rcode.into(),
        }
    }

    /// Create a TSIG key error
    pub fn tsig(msg: impl Into<String>) -> Self {
        Self::Tsig(msg.into())
    }

    /// Whether the error is an unrecoverable precondition failure
    ///
    /// Configuration, key and zone-discovery problems stop the run before any
    /// update is attempted. Everything else is a failure of the update itself.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::ZoneDiscovery(_)
                | Self::Tsig(_)
                | Self::Io(_)
                | Self::Json(_)
                | Self::Toml(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_message_carries_rcode() {
        let err = Error::rejected("REFUSED");
        assert_eq!(
            err.to_string(),
            "Server refused registration. Code: REFUSED"
        );
    }

    #[test]
    fn test_precondition_classification() {
        assert!(Error::config("Missing server name").is_precondition());
        assert!(Error::zone_discovery("Couldn't find a zone").is_precondition());
        assert!(!Error::parse("bad address").is_precondition());
        assert!(!Error::transport("timed out").is_precondition());
        assert!(!Error::rejected("NOTAUTH").is_precondition());
    }
}
