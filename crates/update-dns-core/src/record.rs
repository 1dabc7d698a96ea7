//! Update request parsing
//!
//! Turns the command-line record text `<name> [ttl] [class] [type [value...]]`
//! into an [`UpdateRequest`]: a typed resource record plus the update mode
//! that decides what the transaction does with it.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType, rdata};

use crate::error::{Error, Result};

/// TTL used when the record text does not carry one
pub const DEFAULT_TTL: u32 = 3600;

/// What the operator asked for on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Action {
    /// Replace the record set of the given type
    #[default]
    Replace,
    /// Add to the existing record set
    Add,
    /// Delete records
    Delete,
}

/// What the update transaction does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// Remove the record set of the record's type, then insert the record
    Replace,
    /// Insert the record, keeping existing records of the same type
    AddOnly,
    /// Remove the record set of the record's type
    DeleteType,
    /// Remove every record set at the name
    DeleteName,
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UpdateMode::Replace => "replace",
            UpdateMode::AddOnly => "add",
            UpdateMode::DeleteType => "delete-type",
            UpdateMode::DeleteName => "delete-name",
        };
        f.write_str(name)
    }
}

/// Record types accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    A,
    Aaaa,
    Cname,
    Mx,
    Ns,
    Ptr,
    Srv,
    Txt,
    /// Wildcard type, only meaningful for whole-name deletion
    Any,
    /// Any other registered type, accepted for record set deletion only
    Other(RecordType),
}

impl RecordKind {
    /// The wire record type
    pub fn record_type(self) -> RecordType {
        match self {
            RecordKind::A => RecordType::A,
            RecordKind::Aaaa => RecordType::AAAA,
            RecordKind::Cname => RecordType::CNAME,
            RecordKind::Mx => RecordType::MX,
            RecordKind::Ns => RecordType::NS,
            RecordKind::Ptr => RecordType::PTR,
            RecordKind::Srv => RecordType::SRV,
            RecordKind::Txt => RecordType::TXT,
            RecordKind::Any => RecordType::ANY,
            RecordKind::Other(record_type) => record_type,
        }
    }

    /// Parse type-specific value fields into record data
    fn parse_rdata(self, value: &[String]) -> Result<RData> {
        let first = value
            .first()
            .ok_or_else(|| Error::parse(format!("Missing value for {} record", self)))?;

        let rdata = match self {
            RecordKind::A => RData::A(rdata::A(first.parse().map_err(|_| {
                Error::parse(format!("Invalid IPv4 address '{}'", first))
            })?)),
            RecordKind::Aaaa => RData::AAAA(rdata::AAAA(first.parse().map_err(|_| {
                Error::parse(format!("Invalid IPv6 address '{}'", first))
            })?)),
            RecordKind::Cname => RData::CNAME(rdata::CNAME(fqdn(first)?)),
            RecordKind::Ns => RData::NS(rdata::NS(fqdn(first)?)),
            RecordKind::Ptr => RData::PTR(rdata::PTR(fqdn(first)?)),
            RecordKind::Mx => {
                let [preference, exchange] = value else {
                    return Err(Error::parse(
                        "Need two MX data fields (preference and exchange)",
                    ));
                };
                RData::MX(rdata::MX::new(
                    parse_u16("MX preference", preference)?,
                    fqdn(exchange)?,
                ))
            }
            RecordKind::Srv => {
                let [priority, weight, port, target] = value else {
                    return Err(Error::parse(
                        "Need four SRV data fields (priority, weight, port and target)",
                    ));
                };
                RData::SRV(rdata::SRV::new(
                    parse_u16("SRV priority", priority)?,
                    parse_u16("SRV weight", weight)?,
                    parse_u16("SRV port", port)?,
                    fqdn(target)?,
                ))
            }
            RecordKind::Txt => RData::TXT(rdata::TXT::new(
                value.iter().map(|s| unquote(s).to_string()).collect(),
            )),
            RecordKind::Any | RecordKind::Other(_) => {
                return Err(Error::parse(format!("{} records carry no value", self)));
            }
        };

        Ok(rdata)
    }
}

impl FromStr for RecordKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(RecordKind::A),
            "AAAA" => Ok(RecordKind::Aaaa),
            "CNAME" => Ok(RecordKind::Cname),
            "MX" => Ok(RecordKind::Mx),
            "NS" => Ok(RecordKind::Ns),
            "PTR" => Ok(RecordKind::Ptr),
            "SRV" => Ok(RecordKind::Srv),
            "TXT" => Ok(RecordKind::Txt),
            "ANY" => Ok(RecordKind::Any),
            other => match RecordType::from_str(other) {
                Ok(RecordType::Unknown(_)) | Err(_) => {
                    Err(Error::parse(format!("Unsupported record type '{}'", other)))
                }
                Ok(record_type) => Ok(RecordKind::Other(record_type)),
            },
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.record_type())
    }
}

/// A parsed update request
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    name: Name,
    ttl: u32,
    kind: RecordKind,
    rdata: Option<RData>,
    mode: UpdateMode,
}

/// The typed part of the record text, before the mode is decided
struct TypedRecord {
    ttl: u32,
    kind: RecordKind,
    rdata: Option<RData>,
}

impl UpdateRequest {
    /// Parse a request from the record name, the remaining record fields and
    /// the requested action
    ///
    /// A record that fails to parse is only tolerated for [`Action::Delete`],
    /// where the request falls back to deleting every record at the name.
    pub fn parse(name: &str, fields: &[String], action: Action) -> Result<Self> {
        if name.is_empty() {
            return Err(Error::config("Missing record name"));
        }
        let name = fqdn(name)?;

        let typed = parse_typed(fields);

        match action {
            Action::Replace | Action::Add => {
                let typed = typed?;
                let rdata = match (typed.kind, typed.rdata) {
                    (RecordKind::Any | RecordKind::Other(_), _) => {
                        return Err(Error::parse(format!(
                            "{} records can only be deleted",
                            typed.kind
                        )));
                    }
                    (kind, None) => {
                        return Err(Error::parse(format!("Missing value for {} record", kind)));
                    }
                    (_, Some(rdata)) => rdata,
                };
                let mode = if action == Action::Add {
                    UpdateMode::AddOnly
                } else {
                    UpdateMode::Replace
                };
                Ok(Self {
                    name,
                    ttl: typed.ttl,
                    kind: typed.kind,
                    rdata: Some(rdata),
                    mode,
                })
            }
            Action::Delete => match typed {
                Ok(TypedRecord {
                    kind: RecordKind::Any,
                    ..
                }) => Ok(Self::delete_name(name)),
                Ok(typed) => Ok(Self {
                    name,
                    ttl: 0,
                    kind: typed.kind,
                    rdata: typed.rdata,
                    mode: UpdateMode::DeleteType,
                }),
                Err(e) => {
                    if !fields.is_empty() {
                        tracing::warn!(
                            "Record for {} did not parse ({}), deleting all records at the name",
                            name,
                            e
                        );
                    }
                    Ok(Self::delete_name(name))
                }
            },
        }
    }

    /// Request removal of every record at `name`
    pub fn delete_name(name: Name) -> Self {
        Self {
            name,
            ttl: 0,
            kind: RecordKind::Any,
            rdata: None,
            mode: UpdateMode::DeleteName,
        }
    }

    /// Record owner name
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Record TTL (zero for deletions)
    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// Record type
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Parsed record data, if a value was supplied
    pub fn rdata(&self) -> Option<&RData> {
        self.rdata.as_ref()
    }

    /// Update mode
    pub fn mode(&self) -> UpdateMode {
        self.mode
    }

    /// The resource record to transmit
    ///
    /// Without record data this is a name-and-type record with class ANY and
    /// zero TTL, the form RFC 2136 uses for record set removal.
    pub fn to_record(&self) -> Record {
        match &self.rdata {
            Some(rdata) => Record::from_rdata(self.name.clone(), self.ttl, rdata.clone()),
            None => {
                let mut record = Record::update0(self.name.clone(), 0, self.kind.record_type());
                record.set_dns_class(DNSClass::ANY);
                record
            }
        }
    }

    /// The reverse (PTR) request matching an A or AAAA request
    ///
    /// Returns `None` when there is no address to derive the reverse name
    /// from.
    pub fn reverse(&self) -> Option<Self> {
        let ip = match self.rdata.as_ref()? {
            RData::A(rdata::A(v4)) => IpAddr::V4(*v4),
            RData::AAAA(rdata::AAAA(v6)) => IpAddr::V6(*v6),
            _ => return None,
        };

        let ptr = RData::PTR(rdata::PTR(self.name.clone()));
        let rdata = match self.mode {
            UpdateMode::Replace | UpdateMode::AddOnly | UpdateMode::DeleteType => Some(ptr),
            UpdateMode::DeleteName => return None,
        };

        Some(Self {
            name: Name::from(ip),
            ttl: self.ttl,
            kind: RecordKind::Ptr,
            rdata,
            mode: self.mode,
        })
    }
}

fn parse_typed(fields: &[String]) -> Result<TypedRecord> {
    let mut rest = fields;

    let mut ttl = DEFAULT_TTL;
    if let Some((first, tail)) = rest.split_first()
        && let Ok(parsed) = first.parse::<u32>()
    {
        ttl = parsed;
        rest = tail;
    }

    if let Some((first, tail)) = rest.split_first()
        && first.eq_ignore_ascii_case("IN")
    {
        rest = tail;
    }

    let (kind, value) = rest
        .split_first()
        .ok_or_else(|| Error::parse("Missing record type"))?;
    let kind: RecordKind = kind.parse()?;

    let rdata = match (kind, value.is_empty()) {
        (RecordKind::Any | RecordKind::Other(_), _) | (_, true) => None,
        (kind, false) => Some(kind.parse_rdata(value)?),
    };

    Ok(TypedRecord { ttl, kind, rdata })
}

/// Parse a domain name, appending the trailing dot when missing
pub fn fqdn(name: &str) -> Result<Name> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::parse("Empty domain name"));
    }
    let text = if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{}.", name)
    };
    Name::from_ascii(&text)
        .map_err(|e| Error::parse(format!("Invalid domain name '{}': {}", name, e)))
}

fn parse_u16(what: &str, value: &str) -> Result<u16> {
    value
        .parse()
        .map_err(|_| Error::parse(format!("Invalid {} '{}'", what, value)))
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
}
