//! One update run
//!
//! Zone discovery, record parsing and submission in command-line order,
//! followed by the optional reverse (PTR) update for address records.

use crate::config::UpdateConfig;
use crate::error::{Error, Result};
use crate::record::{Action, UpdateRequest, fqdn};
use crate::traits::DnsTransport;
use crate::update::submit_update;
use crate::zone::resolve_zone;

/// Update the record `name` described by `fields`
///
/// The zone is discovered before the record is parsed, so a bad server or
/// zone is reported ahead of a bad record. With `reverse`, the PTR update is
/// submitted only after the forward update succeeded.
///
/// # Errors
///
/// - `Error::Config`: empty record name, or a broken TSIG configuration
/// - `Error::ZoneDiscovery`: no zone found for the record or its address
/// - `Error::Parse`: the record text does not parse
/// - `Error::Transport` / `Error::Rejected`: an update was not accepted
pub async fn run_update(
    name: &str,
    fields: &[String],
    action: Action,
    reverse: bool,
    config: &UpdateConfig,
    transport: &dyn DnsTransport,
) -> Result<()> {
    if name.is_empty() {
        return Err(Error::config("Missing record name"));
    }

    let zone = resolve_zone(&fqdn(name)?, config, transport).await?;
    tracing::info!("Got zone: {}", zone);

    let request = UpdateRequest::parse(name, fields, action)?;
    submit_update(&request.to_record(), &zone, request.mode(), config, transport).await?;
    log_outcome(transport, "Update");

    if reverse {
        submit_reverse(&request, config, transport).await?;
    }

    Ok(())
}

/// Submit the PTR update matching an A or AAAA request
///
/// The zone is always discovered for the reverse name; a configured zone
/// only applies to the forward record.
///
/// # Returns
///
/// - `Ok(true)`: the PTR update was submitted
/// - `Ok(false)`: the request has no address to derive a PTR record from
pub async fn submit_reverse(
    request: &UpdateRequest,
    config: &UpdateConfig,
    transport: &dyn DnsTransport,
) -> Result<bool> {
    let Some(reverse) = request.reverse() else {
        tracing::warn!(
            "No reverse record for {} {} ({})",
            request.name(),
            request.kind(),
            request.mode()
        );
        return Ok(false);
    };

    let reverse_config = UpdateConfig {
        zone: None,
        ..config.clone()
    };

    let zone = resolve_zone(reverse.name(), &reverse_config, transport).await?;
    tracing::info!("Got reverse zone: {}", zone);

    submit_update(&reverse.to_record(), &zone, reverse.mode(), config, transport).await?;
    log_outcome(transport, "Reverse update");

    Ok(true)
}

fn log_outcome(transport: &dyn DnsTransport, what: &str) {
    if transport.is_dry_run() {
        tracing::info!("[DRY-RUN] {} not sent", what);
    } else {
        tracing::info!("{} successful", what);
    }
}
