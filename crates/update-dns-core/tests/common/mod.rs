//! Test doubles and common utilities for contract tests
//!
//! The recording transport stands in for the DNS server: it captures every
//! message handed to it together with the key it was asked to sign with, and
//! answers with a scripted response.

#![allow(dead_code)]

use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::{Name, RData, Record, rdata};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use update_dns_core::error::{Error, Result};
use update_dns_core::traits::DnsTransport;
use update_dns_core::{TsigKey, UpdateConfig};

/// What the recording transport answers with
#[derive(Clone)]
enum Script {
    Respond(Message),
    Sequence(Arc<Mutex<VecDeque<Message>>>),
    Fail(String),
}

/// A DnsTransport that records exchanges and answers from a script
#[derive(Clone)]
pub struct RecordingTransport {
    script: Script,
    exchanges: Arc<Mutex<Vec<(Message, Option<TsigKey>)>>>,
    call_count: Arc<AtomicUsize>,
}

impl RecordingTransport {
    /// Answer every exchange with `response`
    pub fn responding(response: Message) -> Self {
        Self {
            script: Script::Respond(response),
            exchanges: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Answer every exchange with an empty response carrying `rcode`
    pub fn with_rcode(rcode: ResponseCode) -> Self {
        Self::responding(rcode_response(rcode))
    }

    /// Answer exchanges with `responses`, in order; fail once they run out
    pub fn scripted(responses: Vec<Message>) -> Self {
        Self {
            script: Script::Sequence(Arc::new(Mutex::new(responses.into()))),
            exchanges: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fail every exchange with a transport error
    pub fn failing(reason: &str) -> Self {
        Self {
            script: Script::Fail(reason.to_string()),
            exchanges: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of exchanges attempted
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Messages sent so far, with the key each was signed with
    pub fn exchanges(&self) -> Vec<(Message, Option<TsigKey>)> {
        self.exchanges.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DnsTransport for RecordingTransport {
    async fn exchange(&self, request: Message, key: Option<&TsigKey>) -> Result<Message> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.exchanges
            .lock()
            .unwrap()
            .push((request.clone(), key.cloned()));

        let mut response = match &self.script {
            Script::Respond(response) => response.clone(),
            Script::Sequence(queue) => queue
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| Error::transport("no scripted response left"))?,
            Script::Fail(reason) => return Err(Error::transport(reason.clone())),
        };
        response.set_id(request.id());
        Ok(response)
    }

    fn server(&self) -> String {
        "192.0.2.53:53".to_string()
    }

    fn transport_name(&self) -> &'static str {
        "recording"
    }
}

/// Parse a name, for test fixtures
pub fn name(s: &str) -> Name {
    Name::from_ascii(s).unwrap()
}

/// An SOA record owned by `owner`
pub fn soa_record(owner: &str) -> Record {
    Record::from_rdata(
        name(owner),
        3600,
        RData::SOA(rdata::SOA::new(
            name("ns1.example.org."),
            name("hostmaster.example.org."),
            2024010101,
            7200,
            900,
            1209600,
            300,
        )),
    )
}

/// An empty response carrying `rcode`
pub fn rcode_response(rcode: ResponseCode) -> Message {
    let mut response = Message::new();
    response
        .set_message_type(MessageType::Response)
        .set_response_code(rcode);
    response
}

/// An NXDOMAIN response carrying the zone's SOA in the authority section
pub fn nxdomain_with_soa(zone: &str) -> Message {
    let mut response = Message::new();
    response
        .set_message_type(MessageType::Response)
        .set_response_code(ResponseCode::NXDomain)
        .add_name_server(soa_record(zone));
    response
}

/// A configuration with a server and TSIG key but no zone override
pub fn minimal_config() -> UpdateConfig {
    UpdateConfig {
        server: "192.0.2.53".to_string(),
        tsig_name: "update-key".to_string(),
        tsig_secret: "c2VjcmV0LWtleQ==".to_string(),
        ..UpdateConfig::default()
    }
}
