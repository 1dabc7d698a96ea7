//! Configuration types for update-dns
//!
//! The configuration is read once at startup from a TOML or JSON file whose
//! keys match the kebab-case field names below, then optionally overridden by
//! command-line flags. It is immutable afterwards.

use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use hickory_proto::rr::Name;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::fqdn;
use crate::tsig::{TsigAlgorithmName, TsigKey};

/// Port used when the server address does not name one
pub const DEFAULT_DNS_PORT: u16 = 53;

/// Main update-dns configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateConfig {
    /// Server address, `host` or `host:port`
    #[serde(default)]
    pub server: String,

    /// TSIG key name
    #[serde(default)]
    pub tsig_name: String,

    /// TSIG shared secret (base64)
    #[serde(default)]
    pub tsig_secret: String,

    /// TSIG HMAC algorithm
    #[serde(default)]
    pub tsig_algorithm: TsigAlgorithmName,

    /// Zone to update, auto-detected via SOA query when absent
    #[serde(default)]
    pub zone: Option<String>,

    /// Verbose logging and full error details
    #[serde(default)]
    pub debug: bool,

    /// Transport protocol
    #[serde(default)]
    pub transport: TransportKind,

    /// Per-exchange timeout in seconds, transport default when absent
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Transport protocol used to reach the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// UDP with EDNS0
    #[default]
    Udp,
    /// TCP
    Tcp,
}

impl UpdateConfig {
    /// Parse a TOML configuration document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse a JSON configuration document
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Override the server address
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    /// Override the zone
    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.trim().is_empty() {
            return Err(Error::config("Missing server name"));
        }

        if self.tsig_secret.is_empty() {
            return Err(Error::config("Missing tsig-secret"));
        }

        if self.tsig_name.is_empty() {
            return Err(Error::config("Missing tsig-name"));
        }

        if let Some(zone) = self.zone.as_deref()
            && !zone.is_empty()
        {
            fqdn(zone).map_err(|e| Error::config(format!("Invalid zone: {}", e)))?;
        }

        if self.timeout_secs == Some(0) {
            return Err(Error::config("timeout-secs must be > 0"));
        }

        Ok(())
    }

    /// The explicit zone override in FQDN form, if one is configured
    pub fn zone_name(&self) -> Result<Option<Name>> {
        match self.zone.as_deref() {
            Some(zone) if !zone.is_empty() => Ok(Some(fqdn(zone)?)),
            _ => Ok(None),
        }
    }

    /// Resolve the server address, defaulting the port to 53
    pub fn server_addr(&self) -> Result<SocketAddr> {
        let server = self.server.trim();
        let with_port = if server.parse::<SocketAddr>().is_ok() || has_port(server) {
            server.to_string()
        } else if server.contains(':') {
            // bare IPv6 address
            let host = server.trim_matches(|c| c == '[' || c == ']');
            format!("[{}]:{}", host, DEFAULT_DNS_PORT)
        } else {
            format!("{}:{}", server, DEFAULT_DNS_PORT)
        };

        with_port
            .to_socket_addrs()
            .map_err(|e| {
                Error::config(format!("Unable to resolve server address {}: {}", server, e))
            })?
            .next()
            .ok_or_else(|| Error::config(format!("No address found for server {}", server)))
    }

    /// The TSIG key described by this configuration
    pub fn tsig_key(&self) -> Result<TsigKey> {
        TsigKey::new(&self.tsig_name, &self.tsig_secret, self.tsig_algorithm)
    }

    /// The per-exchange timeout, if configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Whether `server` is `host:port` (not a bare IPv6 address)
fn has_port(server: &str) -> bool {
    match server.rsplit_once(':') {
        Some((host, port)) => !host.contains(':') && port.parse::<u16>().is_ok(),
        None => false,
    }
}
