// # hickory DNS Transport
//
// `DnsTransport` implementation over `hickory-client`.
//
// ## Behavior
//
// - Opens a fresh UDP or TCP client per exchange; no connection is kept
//   between the SOA query and the update
// - Attaches a `TSigner` when a key is passed, so the request is signed with
//   the current time right before transmission and the response MAC is
//   verified
// - Sends the message once and returns the first response, whatever its
//   response code
// - NO retry logic: a failed exchange is reported to the caller
//
// ## Dry-Run Mode
//
// Queries are sent normally. UPDATE messages are logged and answered locally
// with NOERROR instead of being transmitted.
//
// ## Security
//
// The TSIG secret never appears in logs; only the key name is logged.

use async_trait::async_trait;
use hickory_client::client::Client;
use hickory_proto::op::{Message, MessageFinalizer, MessageType, OpCode, ResponseCode};
use hickory_proto::runtime::TokioRuntimeProvider;
use hickory_proto::tcp::TcpClientStream;
use hickory_proto::udp::UdpClientStream;
use hickory_proto::xfer::{DnsHandle, DnsRequest, DnsRequestOptions};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::StreamExt;
use update_dns_core::traits::DnsTransport;
use update_dns_core::{Error, Result, TransportKind, TsigKey, UpdateConfig};

/// Request timeout when none is configured, hickory's own default
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// DNS transport backed by `hickory-client`
#[derive(Debug, Clone)]
pub struct HickoryTransport {
    /// Server to exchange messages with
    server: SocketAddr,

    /// UDP or TCP
    kind: TransportKind,

    /// Per-exchange timeout, hickory's default when `None`
    timeout: Option<Duration>,

    /// Dry-run mode: if true, answer UPDATE messages locally
    dry_run: bool,
}

impl HickoryTransport {
    /// Create a transport for `server`
    pub fn new(server: SocketAddr, kind: TransportKind, timeout: Option<Duration>) -> Self {
        Self {
            server,
            kind,
            timeout,
            dry_run: false,
        }
    }

    /// Create a transport from the server, protocol and timeout settings
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the server address cannot be resolved.
    pub fn from_config(config: &UpdateConfig) -> Result<Self> {
        Ok(Self::new(
            config.server_addr()?,
            config.transport,
            config.timeout(),
        ))
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Connect a client, signing with `key` when given
    async fn connect(&self, key: Option<&TsigKey>) -> Result<Client> {
        let signer: Option<Arc<dyn MessageFinalizer>> = match key {
            Some(key) => Some(Arc::new(key.signer()?)),
            None => None,
        };

        match self.kind {
            TransportKind::Udp => {
                let stream = UdpClientStream::builder(self.server, TokioRuntimeProvider::new())
                    .with_timeout(self.timeout)
                    .with_signer(signer)
                    .build();
                let (client, bg) = Client::connect(stream).await.map_err(|e| {
                    Error::transport(format!("UDP connect to {}: {}", self.server, e))
                })?;
                tokio::spawn(bg);
                Ok(client)
            }
            TransportKind::Tcp => {
                let (stream, sender) = TcpClientStream::new(
                    self.server,
                    None,
                    self.timeout,
                    TokioRuntimeProvider::new(),
                );
                let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
                let (client, bg) = Client::with_timeout(stream, sender, timeout, signer)
                    .await
                    .map_err(|e| {
                        Error::transport(format!("TCP connect to {}: {}", self.server, e))
                    })?;
                tokio::spawn(bg);
                Ok(client)
            }
        }
    }
}

#[async_trait]
impl DnsTransport for HickoryTransport {
    async fn exchange(&self, request: Message, key: Option<&TsigKey>) -> Result<Message> {
        if self.dry_run && request.op_code() == OpCode::Update {
            tracing::info!(
                "[DRY-RUN] Would send update to {} ({} updates)",
                self.server,
                request.name_servers().len()
            );
            return Ok(dry_run_response(&request));
        }

        if let Some(key) = key {
            tracing::debug!("Signing request with TSIG key {}", key.name());
        }

        let client = self.connect(key).await?;

        let responses = client.send(DnsRequest::new(request, DnsRequestOptions::default()));
        tokio::pin!(responses);
        let response = responses
            .next()
            .await
            .ok_or_else(|| Error::transport(format!("No response from {}", self.server)))?
            .map_err(|e| {
                Error::transport(format!("Exchange with {} failed: {}", self.server, e))
            })?;

        let response = response.into_message();
        tracing::debug!(
            "Received response from {}: {}",
            self.server,
            response.response_code()
        );
        Ok(response)
    }

    fn server(&self) -> String {
        self.server.to_string()
    }

    fn transport_name(&self) -> &'static str {
        match self.kind {
            TransportKind::Udp => "udp",
            TransportKind::Tcp => "tcp",
        }
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

/// The NOERROR answer a dry run reports for an UPDATE
fn dry_run_response(request: &Message) -> Message {
    let mut response = Message::new();
    response
        .set_id(request.id())
        .set_message_type(MessageType::Response)
        .set_op_code(OpCode::Update)
        .set_response_code(ResponseCode::NoError);
    response
}
