//! Core traits for update-dns
//!
//! - [`DnsTransport`]: the single request/response exchange with the server

pub mod dns_transport;

pub use dns_transport::DnsTransport;
