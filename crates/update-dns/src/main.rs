// # update-dns - Dynamic DNS update client
//
// Thin integration layer over `update-dns-core`:
// 1. Parse the command line and load the configuration file
// 2. Initialize logging and a current-thread runtime
// 3. Hand the request and a hickory transport to `run_update`, which
//    discovers the zone, submits the signed update and the optional PTR
//    update
//
// ## Configuration
//
// TOML or JSON file, see `config_file` for the search order:
//
// ```toml
// server = "ns1.example.org:53"
// tsig-name = "update-key"
// tsig-secret = "c2VjcmV0LWtleQ=="
// # optional
// zone = "example.org"
// tsig-algorithm = "hmac-sha256"
// transport = "udp"
// timeout-secs = 5
// debug = false
// ```
//
// `UPDATE_DNS_LOG_LEVEL` sets the log level (default `info`); `debug = true`
// forces `debug`.
//
// ## Example
//
// ```bash
// update-dns test.example.org 300 A 127.0.0.1
// update-dns -a test.example.org TXT "hello world"
// update-dns -d test.example.org A
// update-dns -d test.example.org
// ```

mod cli;
mod config_file;

use clap::Parser;
use std::env;
use std::process::ExitCode;
use tracing::{Level, debug, error};
use tracing_subscriber::FmtSubscriber;
use update_dns_core::{Error, UpdateConfig, run_update};
use update_dns_hickory::HickoryTransport;

use crate::cli::Args;

/// Exit codes for the possible outcomes of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdateDnsExitCode {
    /// Update accepted by the server
    Success = 0,
    /// Record did not parse, or the update was not accepted
    UpdateFailed = 1,
    /// Configuration, record name or zone discovery failure
    Fatal = 2,
}

impl From<UpdateDnsExitCode> for ExitCode {
    fn from(code: UpdateDnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl From<&Error> for UpdateDnsExitCode {
    fn from(err: &Error) -> Self {
        if err.is_precondition() {
            UpdateDnsExitCode::Fatal
        } else {
            UpdateDnsExitCode::UpdateFailed
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration before logging is up
    let config = match load_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return UpdateDnsExitCode::Fatal.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("{}", e);
        return UpdateDnsExitCode::Fatal.into();
    }

    let env_level = env::var("UPDATE_DNS_LOG_LEVEL").ok();
    let log_level = log_level(env_level.as_deref(), config.debug);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return UpdateDnsExitCode::Fatal.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return UpdateDnsExitCode::Fatal.into();
        }
    };

    let result = rt.block_on(async {
        match run(&args, &config).await {
            Ok(()) => UpdateDnsExitCode::Success,
            Err(e) => {
                error!("{}", e);
                if config.debug {
                    debug!("{:?}", e);
                }
                UpdateDnsExitCode::from(&e)
            }
        }
    });

    result.into()
}

/// Locate and load the configuration file, then apply command-line overrides
fn load_config(args: &Args) -> anyhow::Result<UpdateConfig> {
    let candidates = config_file::default_paths();
    let path = config_file::find_config_file(args.config.as_deref(), &candidates)?;
    let mut config = config_file::load_config(&path)?;

    if let Some(server) = &args.server {
        config = config.with_server(server.clone());
    }
    if let Some(zone) = &args.zone {
        config = config.with_zone(zone.clone());
    }

    Ok(config)
}

/// Log level from `UPDATE_DNS_LOG_LEVEL`, forced to debug by the config
fn log_level(env_level: Option<&str>, debug: bool) -> Level {
    if debug {
        return Level::DEBUG;
    }

    match env_level.map(str::to_lowercase).as_deref() {
        Some("trace") => Level::TRACE,
        Some("debug") => Level::DEBUG,
        Some("warn") => Level::WARN,
        Some("error") => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Run one update against the configured server
async fn run(args: &Args, config: &UpdateConfig) -> Result<(), Error> {
    let transport = HickoryTransport::from_config(config)?.with_dry_run(args.dry_run);

    run_update(
        args.name.as_deref().unwrap_or_default(),
        &args.fields,
        args.action(),
        args.reverse,
        config,
        &transport,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(
            UpdateDnsExitCode::from(&Error::config("Missing record name")),
            UpdateDnsExitCode::Fatal
        );
        assert_eq!(
            UpdateDnsExitCode::from(&Error::zone_discovery("Couldn't find a zone")),
            UpdateDnsExitCode::Fatal
        );
        assert_eq!(
            UpdateDnsExitCode::from(&Error::parse("bad address")),
            UpdateDnsExitCode::UpdateFailed
        );
        assert_eq!(
            UpdateDnsExitCode::from(&Error::rejected("REFUSED")),
            UpdateDnsExitCode::UpdateFailed
        );
        assert_eq!(
            UpdateDnsExitCode::from(&Error::transport("timed out")),
            UpdateDnsExitCode::UpdateFailed
        );
    }

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(None, false), Level::INFO);
        assert_eq!(log_level(Some("WARN"), false), Level::WARN);
        assert_eq!(log_level(Some("bogus"), false), Level::INFO);
        assert_eq!(log_level(Some("error"), true), Level::DEBUG);
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("update-dns.toml");
        std::fs::write(
            &path,
            r#"
server = "192.0.2.1"
tsig-name = "k"
tsig-secret = "c2VjcmV0"
zone = "example.org"
"#,
        )
        .unwrap();

        let args = Args::try_parse_from([
            "update-dns",
            "-c",
            path.to_str().unwrap(),
            "-s",
            "192.0.2.2:5353",
            "-z",
            "",
            "test.example.org",
        ])
        .unwrap();

        let config = load_config(&args).unwrap();
        assert_eq!(config.server, "192.0.2.2:5353");
        assert_eq!(config.zone_name().unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_record_name_is_fatal() {
        let args = Args::try_parse_from(["update-dns"]).unwrap();
        let config = UpdateConfig {
            server: "127.0.0.1".to_string(),
            tsig_name: "k".to_string(),
            tsig_secret: "c2VjcmV0".to_string(),
            ..UpdateConfig::default()
        };

        let err = run(&args, &config).await.unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: Missing record name");
        assert_eq!(UpdateDnsExitCode::from(&err), UpdateDnsExitCode::Fatal);
    }
}
