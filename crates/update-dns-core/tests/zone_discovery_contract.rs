//! Contract Test: Zone Discovery
//!
//! Constraints verified:
//! - An explicit zone is used as-is without any network exchange
//! - Otherwise exactly one unsigned SOA query for the record name is sent
//! - The owner of the first authority-section SOA names the zone
//! - A response without SOA, or a failed exchange, is a zone discovery error

mod common;

use common::*;
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::RecordType;
use update_dns_core::{Error, resolve_zone};

#[tokio::test]
async fn explicit_zone_skips_the_soa_query() {
    let transport = RecordingTransport::with_rcode(ResponseCode::ServFail);
    let config = minimal_config().with_zone("example.org");

    let zone = resolve_zone(&name("test.example.org."), &config, &transport)
        .await
        .expect("configured zone is accepted");

    assert_eq!(zone, name("example.org."));
    assert_eq!(transport.call_count(), 0, "no query for an explicit zone");
}

#[tokio::test]
async fn discovers_zone_from_authority_soa() {
    let transport = RecordingTransport::responding(nxdomain_with_soa("example.org."));

    let zone = resolve_zone(&name("test.example.org."), &minimal_config(), &transport)
        .await
        .expect("zone is discovered");

    assert_eq!(zone, name("example.org."));
    assert_eq!(transport.call_count(), 1, "exactly one SOA query");

    let exchanges = transport.exchanges();
    let (query, key) = &exchanges[0];
    assert!(key.is_none(), "SOA query is not signed");
    assert_eq!(query.queries().len(), 1);
    assert_eq!(query.queries()[0].name(), &name("test.example.org."));
    assert_eq!(query.queries()[0].query_type(), RecordType::SOA);
}

#[tokio::test]
async fn first_soa_wins() {
    let mut response = nxdomain_with_soa("example.org.");
    response.add_name_server(soa_record("org."));
    let transport = RecordingTransport::responding(response);

    let zone = resolve_zone(&name("a.b.example.org."), &minimal_config(), &transport)
        .await
        .unwrap();

    assert_eq!(zone, name("example.org."));
}

#[tokio::test]
async fn response_without_soa_is_an_error() {
    let transport = RecordingTransport::responding(Message::new());

    let err = resolve_zone(&name("test.example.org."), &minimal_config(), &transport)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ZoneDiscovery(_)));
    assert!(err.to_string().contains("test.example.org."));
}

#[tokio::test]
async fn transport_failure_is_a_zone_discovery_error() {
    let transport = RecordingTransport::failing("connection refused");

    let err = resolve_zone(&name("test.example.org."), &minimal_config(), &transport)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ZoneDiscovery(_)));
    assert!(err.to_string().contains("connection refused"));
    assert!(err.is_precondition());
}
