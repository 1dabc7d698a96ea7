//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;
use update_dns_core::Action;

/// Send a TSIG-signed dynamic update (RFC 2136) for one DNS record
///
/// The record is given as `<name> [ttl] [class] [type [value...]]`, e.g.
/// `update-dns test.example.org 300 A 127.0.0.1`. By default existing records
/// of the same name and type are replaced.
#[derive(Parser, Debug)]
#[command(name = "update-dns")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Add the record, keeping existing records of the same type
    #[arg(short, long, conflicts_with = "delete")]
    pub add: bool,

    /// Delete the record set, or every record at the name without a type
    #[arg(short, long)]
    pub delete: bool,

    /// Server to send the update to (overrides the config file)
    #[arg(short, long)]
    pub server: Option<String>,

    /// Zone to update (will be auto-detected if absent)
    #[arg(short, long)]
    pub zone: Option<String>,

    /// Configuration file (or set UPDATE_DNS_CONFIG env var)
    #[arg(short, long, env = "UPDATE_DNS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Also update the matching PTR record of an A or AAAA record
    #[arg(short, long)]
    pub reverse: bool,

    /// Discover the zone and log the update without sending it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Record name
    pub name: Option<String>,

    /// Record fields: [ttl] [class] [type [value...]]
    pub fields: Vec<String>,
}

impl Args {
    /// The requested action
    pub fn action(&self) -> Action {
        if self.delete {
            Action::Delete
        } else if self.add {
            Action::Add
        } else {
            Action::Replace
        }
    }
}
