// # update-dns-core
//
// Core library for RFC 2136 dynamic DNS updates.
//
// ## Architecture Overview
//
// One invocation performs two sequential steps:
// - **Zone resolution**: find the zone enclosing a record name, either from an
//   explicit override or via a single SOA query
// - **Update submission**: build one UPDATE transaction (removal, insertion or
//   both), have it TSIG-signed, send it and interpret the response code
//
// `session::run_update` drives both steps for one command-line request and
// follows up with the matching PTR update when asked to.
//
// Supporting pieces:
// - **UpdateRequest**: parses `<name> [ttl] [class] [type [value...]]` into a
//   resource record plus an update mode
// - **DnsTransport**: trait for the one request/response exchange with the
//   server; the production implementation lives in `update-dns-hickory`
// - **UpdateConfig**: immutable configuration loaded once at startup
//
// ## Design Principles
//
// 1. **Single-shot**: one query and one update per run, no retries
// 2. **No hidden state**: configuration is passed explicitly by reference
// 3. **Library-First**: the binary is a thin layer over this crate

pub mod config;
pub mod error;
pub mod record;
pub mod session;
pub mod traits;
pub mod tsig;
pub mod update;
pub mod zone;

// Re-export core types for convenience
pub use config::{TransportKind, UpdateConfig};
pub use error::{Error, Result};
pub use record::{Action, RecordKind, UpdateMode, UpdateRequest};
pub use session::{run_update, submit_reverse};
pub use traits::DnsTransport;
pub use tsig::{TsigAlgorithmName, TsigKey};
pub use update::{UpdateTransaction, submit_update};
pub use zone::resolve_zone;
