//! Zone discovery
//!
//! Finds the zone an update has to be scoped to. An explicitly configured
//! zone wins; otherwise a single SOA query for the record name is sent and
//! the owner of the SOA record in the response names the zone.
//!
//! For a name below the apex the server answers with NXDOMAIN or NODATA and
//! puts the zone's SOA in the authority section, so the response code itself
//! is not inspected.

use hickory_proto::op::{Edns, Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, Record, RecordType};

use crate::config::UpdateConfig;
use crate::error::{Error, Result};
use crate::traits::DnsTransport;

/// UDP payload size advertised in the EDNS0 OPT record of the SOA query
pub const EDNS_PAYLOAD_SIZE: u16 = 4096;

/// Resolve the zone enclosing `record_name`
///
/// # Returns
///
/// - `Ok(Name)`: the configured zone, or the owner of the first SOA record
///   found in the authority section of the SOA response
/// - `Err(Error::ZoneDiscovery)`: if the query failed or no SOA was found
pub async fn resolve_zone(
    record_name: &Name,
    config: &UpdateConfig,
    transport: &dyn DnsTransport,
) -> Result<Name> {
    if let Some(zone) = config.zone_name()? {
        tracing::debug!("Using configured zone {}", zone);
        return Ok(zone);
    }

    tracing::debug!(
        "Querying {} for the SOA of {} via {}",
        transport.server(),
        record_name,
        transport.transport_name()
    );

    let response = transport
        .exchange(soa_query(record_name), None)
        .await
        .map_err(|e| Error::zone_discovery(e.to_string()))?;

    find_zone(&response, record_name).ok_or_else(|| {
        Error::zone_discovery(format!("Couldn't find a zone for {}", record_name))
    })
}

/// Build the SOA query for `name`
///
/// EDNS0 with a 4096 byte payload and the DO bit set, as `dig +dnssec` sends.
pub fn soa_query(name: &Name) -> Message {
    let mut query = Query::query(name.clone(), RecordType::SOA);
    query.set_query_class(DNSClass::IN);

    let mut edns = Edns::new();
    edns.set_max_payload(EDNS_PAYLOAD_SIZE).set_dnssec_ok(true);

    let mut message = Message::new();
    message
        .set_id(rand::random())
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .add_query(query);
    message.set_edns(edns);
    message
}

/// Pick the zone name out of an SOA response
///
/// The authority section is searched first. A name that is itself a zone
/// apex gets its SOA in the answer section instead, which is accepted only
/// when the SOA owner is the queried name.
pub fn find_zone(response: &Message, queried: &Name) -> Option<Name> {
    first_soa(response.name_servers())
        .or_else(|| first_soa(response.answers()).filter(|owner| owner == queried))
}

fn first_soa(records: &[Record]) -> Option<Name> {
    records
        .iter()
        .find(|record| record.record_type() == RecordType::SOA)
        .map(|record| record.name().clone())
}
