// # DNS Transport Trait
//
// Defines the interface for exchanging one DNS message with the configured
// server.
//
// ## Implementations
//
// - hickory-client over UDP or TCP: `update-dns-hickory` crate
// - In-memory recording transport: `tests/common` in this crate
//
// ## Usage
//
// ```rust,ignore
// use update_dns_core::DnsTransport;
//
// async fn ask(transport: &dyn DnsTransport, query: Message) -> update_dns_core::Result<()> {
//     let response = transport.exchange(query, None).await?;
//     println!("{}", response.response_code());
//     Ok(())
// }
// ```

use async_trait::async_trait;
use hickory_proto::op::Message;

use crate::tsig::TsigKey;

/// Trait for DNS transport implementations
///
/// # Single-shot
///
/// One call sends one message and returns the first response. Timeouts belong
/// to the transport library; an implementation must not add its own retry
/// loop on top.
///
/// # Signing
///
/// When a key is passed, the request is TSIG-signed just before it goes on
/// the wire (fudge and algorithm taken from the key, time from the wall
/// clock) and the response MAC is verified with the same key.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    /// Send `request` and wait for the response
    ///
    /// # Parameters
    ///
    /// - `request`: the fully built message (query or update)
    /// - `key`: TSIG key to sign with, `None` for unsigned queries
    ///
    /// # Returns
    ///
    /// - `Ok(Message)`: the server's response, whatever its response code
    /// - `Err(Error::Transport)`: if the exchange failed
    async fn exchange(
        &self,
        request: Message,
        key: Option<&TsigKey>,
    ) -> Result<Message, crate::Error>;

    /// The server address, for logging
    fn server(&self) -> String;

    /// Short name of the transport (for logging/debugging)
    fn transport_name(&self) -> &'static str;

    /// Whether UPDATE messages are only logged instead of sent
    fn is_dry_run(&self) -> bool {
        false
    }
}
