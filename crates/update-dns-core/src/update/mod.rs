//! Update submission
//!
//! Builds the RFC 2136 UPDATE transaction for a record and mode, hands it to
//! the transport together with the TSIG key, and interprets the response
//! code.
//!
//! | Mode          | Update section                                     |
//! |---------------|----------------------------------------------------|
//! | `Replace`     | delete RRset (name, type) + add record             |
//! | `AddOnly`     | add record                                         |
//! | `DeleteType`  | delete RRset (name, type)                          |
//! | `DeleteName`  | delete all RRsets (name, ANY)                      |
//!
//! RRset deletions are encoded as class ANY, TTL 0 and empty rdata.

use std::fmt;

use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::{DNSClass, Name, Record, RecordType};

use crate::config::UpdateConfig;
use crate::error::{Error, Result};
use crate::record::UpdateMode;
use crate::traits::DnsTransport;
use crate::tsig::TsigKey;

/// One dynamic-update transaction: the zone plus removals and insertions
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateTransaction {
    zone: Name,
    removals: Vec<Record>,
    insertions: Vec<Record>,
}

impl UpdateTransaction {
    /// Build the transaction applying `mode` to `record` in `zone`
    pub fn build(record: &Record, zone: &Name, mode: UpdateMode) -> Result<Self> {
        let mut removals = Vec::new();
        let mut insertions = Vec::new();

        match mode {
            UpdateMode::Replace => {
                removals.push(rrset_removal(record.name(), record.record_type()));
                insertions.push(insertable(record)?);
            }
            UpdateMode::AddOnly => {
                insertions.push(insertable(record)?);
            }
            UpdateMode::DeleteType => {
                removals.push(rrset_removal(record.name(), record.record_type()));
            }
            UpdateMode::DeleteName => {
                removals.push(rrset_removal(record.name(), RecordType::ANY));
            }
        }

        Ok(Self {
            zone: zone.clone(),
            removals,
            insertions,
        })
    }

    /// Zone the transaction is scoped to
    pub fn zone(&self) -> &Name {
        &self.zone
    }

    /// RRset removals, in transmission order
    pub fn removals(&self) -> &[Record] {
        &self.removals
    }

    /// Record insertions, in transmission order (after the removals)
    pub fn insertions(&self) -> &[Record] {
        &self.insertions
    }

    /// Encode as an UPDATE message (unsigned; the transport signs it)
    pub fn to_message(&self) -> Message {
        let mut zone = Query::query(self.zone.clone(), RecordType::SOA);
        zone.set_query_class(DNSClass::IN);

        let mut message = Message::new();
        message
            .set_id(rand::random())
            .set_message_type(MessageType::Query)
            .set_op_code(OpCode::Update)
            .set_recursion_desired(false)
            .add_query(zone);

        for record in self.removals.iter().chain(self.insertions.iter()) {
            message.add_name_server(record.clone());
        }

        message
    }
}

impl fmt::Display for UpdateTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, ";; ZONE SECTION:")?;
        writeln!(f, ";{}\tIN\tSOA", self.zone)?;
        writeln!(f)?;
        write!(f, ";; UPDATE SECTION:")?;
        for record in &self.removals {
            write!(
                f,
                "\n{}\t{}\t{}\t{}",
                record.name(),
                record.ttl(),
                record.dns_class(),
                record.record_type()
            )?;
        }
        for record in &self.insertions {
            write!(f, "\n{}", record)?;
        }
        Ok(())
    }
}

/// Submit the update for `record` in `zone`
///
/// Builds the transaction, signs it with the configured TSIG key, sends it
/// to the configured server and checks the response code.
///
/// # Returns
///
/// - `Ok(())`: the server answered NOERROR
/// - `Err(Error::Transport)`: the exchange failed
/// - `Err(Error::Rejected)`: the server answered with another response code
pub async fn submit_update(
    record: &Record,
    zone: &Name,
    mode: UpdateMode,
    config: &UpdateConfig,
    transport: &dyn DnsTransport,
) -> Result<()> {
    let transaction = UpdateTransaction::build(record, zone, mode)?;
    let key = config.tsig_key()?;
    submit_transaction(&transaction, &key, transport).await
}

/// Send an already built transaction, signed with `key`
pub async fn submit_transaction(
    transaction: &UpdateTransaction,
    key: &TsigKey,
    transport: &dyn DnsTransport,
) -> Result<()> {
    tracing::info!("Sending update to {}:\n{}", transport.server(), transaction);

    let response = transport
        .exchange(transaction.to_message(), Some(key))
        .await
        .map_err(|e| match e {
            Error::Transport(_) | Error::Tsig(_) => e,
            other => Error::transport(other.to_string()),
        })?;

    let rcode = response.response_code();
    tracing::debug!("Update response code: {}", rcode_mnemonic(rcode));

    if rcode != ResponseCode::NoError {
        return Err(Error::rejected(rcode_mnemonic(rcode)));
    }

    Ok(())
}

/// RFC 2136 "delete an RRset" (or all RRsets with type ANY)
fn rrset_removal(name: &Name, record_type: RecordType) -> Record {
    let mut record = Record::update0(name.clone(), 0, record_type);
    record.set_dns_class(DNSClass::ANY);
    record
}

fn insertable(record: &Record) -> Result<Record> {
    if record.record_type() == RecordType::ANY || record.dns_class() != DNSClass::IN {
        return Err(Error::parse(format!(
            "No record data to add for {} {}",
            record.name(),
            record.record_type()
        )));
    }
    Ok(record.clone())
}

/// Mnemonic for a response code, as printed by dig and nsupdate
pub fn rcode_mnemonic(rcode: ResponseCode) -> String {
    let code = u16::from(rcode);
    let name = match code {
        0 => "NOERROR",
        1 => "FORMERR",
        2 => "SERVFAIL",
        3 => "NXDOMAIN",
        4 => "NOTIMP",
        5 => "REFUSED",
        6 => "YXDOMAIN",
        7 => "YXRRSET",
        8 => "NXRRSET",
        9 => "NOTAUTH",
        10 => "NOTZONE",
        16 => "BADSIG",
        17 => "BADKEY",
        18 => "BADTIME",
        19 => "BADMODE",
        20 => "BADNAME",
        21 => "BADALG",
        22 => "BADTRUNC",
        23 => "BADCOOKIE",
        _ => return format!("RCODE{}", code),
    };
    name.to_string()
}
