//! TSIG key material
//!
//! The key is built once from configuration and handed to the transport for
//! every signed exchange. The transport owns the actual signing: it stamps
//! each request with the current wall-clock time and verifies the response
//! MAC with the same key.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hickory_proto::dnssec::rdata::tsig::TsigAlgorithm;
use hickory_proto::dnssec::tsig::TSigner;
use hickory_proto::rr::Name;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::fqdn;

/// Validity window for signed messages, in seconds
pub const TSIG_FUDGE_SECS: u16 = 300;

/// HMAC algorithms accepted for TSIG signing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TsigAlgorithmName {
    /// hmac-sha256 (default)
    #[default]
    HmacSha256,
    /// hmac-sha384
    HmacSha384,
    /// hmac-sha512
    HmacSha512,
}

impl TsigAlgorithmName {
    fn to_hickory(self) -> TsigAlgorithm {
        match self {
            TsigAlgorithmName::HmacSha256 => TsigAlgorithm::HmacSha256,
            TsigAlgorithmName::HmacSha384 => TsigAlgorithm::HmacSha384,
            TsigAlgorithmName::HmacSha512 => TsigAlgorithm::HmacSha512,
        }
    }
}

/// A named TSIG shared secret
///
/// # Security
///
/// The Debug implementation does NOT expose the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct TsigKey {
    name: Name,
    algorithm: TsigAlgorithmName,
    secret: Vec<u8>,
    fudge: u16,
}

impl std::fmt::Debug for TsigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TsigKey")
            .field("name", &self.name)
            .field("algorithm", &self.algorithm)
            .field("secret", &"<REDACTED>")
            .field("fudge", &self.fudge)
            .finish()
    }
}

impl TsigKey {
    /// Create a key from its configured name and secret
    ///
    /// The secret is decoded as base64 when it is valid base64, otherwise
    /// its raw bytes are used.
    pub fn new(name: &str, secret: &str, algorithm: TsigAlgorithmName) -> Result<Self> {
        if name.is_empty() {
            return Err(Error::config("Missing tsig-name"));
        }
        if secret.is_empty() {
            return Err(Error::config("Missing tsig-secret"));
        }

        let name = fqdn(name).map_err(|e| Error::tsig(format!("Invalid key name: {}", e)))?;

        let secret = match STANDARD.decode(secret.trim()) {
            Ok(bytes) if !bytes.is_empty() => bytes,
            _ => {
                tracing::debug!("tsig-secret is not base64, using it verbatim");
                secret.as_bytes().to_vec()
            }
        };

        Ok(Self {
            name,
            algorithm,
            secret,
            fudge: TSIG_FUDGE_SECS,
        })
    }

    /// Key name (owner of the TSIG record)
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// HMAC algorithm
    pub fn algorithm(&self) -> TsigAlgorithmName {
        self.algorithm
    }

    /// Validity window in seconds
    pub fn fudge(&self) -> u16 {
        self.fudge
    }

    /// Build the hickory signer for this key
    pub fn signer(&self) -> Result<TSigner> {
        TSigner::new(
            self.secret.clone(),
            self.algorithm.to_hickory(),
            self.name.clone(),
            self.fudge,
        )
        .map_err(|e| Error::tsig(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_secret_is_decoded() {
        let key = TsigKey::new("update-key", "c2VjcmV0LWtleQ==", TsigAlgorithmName::default())
            .unwrap();
        assert_eq!(key.secret, b"secret-key".to_vec());
        assert_eq!(key.name().to_string(), "update-key.");
        assert_eq!(key.fudge(), 300);
        assert_eq!(key.algorithm(), TsigAlgorithmName::HmacSha256);
    }

    #[test]
    fn test_plain_secret_is_used_verbatim() {
        let key = TsigKey::new("update-key.", "not base64!", TsigAlgorithmName::default())
            .unwrap();
        assert_eq!(key.secret, b"not base64!".to_vec());
    }

    #[test]
    fn test_missing_fields_are_config_errors() {
        assert!(matches!(
            TsigKey::new("", "c2VjcmV0", TsigAlgorithmName::default()),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            TsigKey::new("key", "", TsigAlgorithmName::default()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_secret_not_exposed_in_debug() {
        let key = TsigKey::new("update-key", "c2VjcmV0LWtleQ==", TsigAlgorithmName::default())
            .unwrap();
        let debug_str = format!("{:?}", key);
        assert!(!debug_str.contains("c2VjcmV0LWtleQ=="));
        assert!(!debug_str.contains("secret-key"));
        assert!(debug_str.contains("TsigKey"));
    }

    #[test]
    fn test_signer_builds_for_each_algorithm() {
        for algorithm in [
            TsigAlgorithmName::HmacSha256,
            TsigAlgorithmName::HmacSha384,
            TsigAlgorithmName::HmacSha512,
        ] {
            let key = TsigKey::new("update-key", "c2VjcmV0LWtleQ==", algorithm).unwrap();
            assert!(key.signer().is_ok(), "signer for {:?}", algorithm);
        }
    }

    #[test]
    fn test_algorithm_names_deserialize() {
        #[derive(Deserialize)]
        struct Wrapper {
            algorithm: TsigAlgorithmName,
        }
        let parsed: Wrapper = toml::from_str("algorithm = \"hmac-sha512\"").unwrap();
        assert_eq!(parsed.algorithm, TsigAlgorithmName::HmacSha512);
    }
}
