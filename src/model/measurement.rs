use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;

use crate::model::{DecodeError, Rtt, Timings, decode_timings};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementType {
    Ping,
    Traceroute,
    Dns,
    Mtr,
    Http,
    /// Any type this client does not know about yet.
    #[default]
    #[serde(other)]
    Unknown,
}

impl MeasurementType {
    /// Whether `timings` is a mapping of named durations rather than a list of RTTs.
    pub fn has_named_timings(&self) -> bool {
        matches!(self, MeasurementType::Dns | MeasurementType::Http)
    }
}

impl fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementType::Ping => write!(f, "ping"),
            MeasurementType::Traceroute => write!(f, "traceroute"),
            MeasurementType::Dns => write!(f, "dns"),
            MeasurementType::Mtr => write!(f, "mtr"),
            MeasurementType::Http => write!(f, "http"),
            MeasurementType::Unknown => write!(f, "unknown"),
        }
    }
}

/// Response to a successful measurement creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementCreate {
    pub id: String,
    #[serde(default)]
    pub probes_count: u32,
}

pub const STATUS_IN_PROGRESS: &str = "in-progress";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Measurement {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "null_as_default")]
    pub kind: MeasurementType,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub probes_count: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub results: Vec<ProbeResult>,
}

impl Measurement {
    /// Whether the API is still collecting results. Polling is up to the caller.
    pub fn is_in_progress(&self) -> bool {
        self.status == STATUS_IN_PROGRESS
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProbeResult {
    #[serde(deserialize_with = "null_as_default")]
    pub probe: ProbeMeta,
    #[serde(deserialize_with = "null_as_default")]
    pub result: ResultData,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProbeMeta {
    #[serde(deserialize_with = "null_as_default")]
    pub continent: String,
    #[serde(deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
    /// Only set for probes in the US; `null` on the wire becomes an empty string.
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub asn: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub longitude: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub latitude: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub network: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub resolvers: Vec<String>,
}

/// Per-probe result. Holds the union of the fields of every measurement type;
/// fields a type does not produce stay at their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResultData {
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub raw_output: String,

    // ping, traceroute, mtr, http
    #[serde(deserialize_with = "null_as_default")]
    pub resolved_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub resolved_hostname: String,
    /// Shape depends on the measurement type, see [`ResultData::timings`].
    #[serde(rename = "timings")]
    pub timings_raw: Option<Box<RawValue>>,
    #[serde(deserialize_with = "numbers_skip_null")]
    pub stats: BTreeMap<String, f64>,

    // traceroute, mtr
    #[serde(deserialize_with = "null_as_default")]
    pub hops: Vec<Hop>,

    // dns
    #[serde(deserialize_with = "null_as_default")]
    pub status_code_name: String,
    pub status_code: Option<u16>,
    #[serde(deserialize_with = "null_as_default")]
    pub answers: Vec<DnsAnswer>,
    #[serde(deserialize_with = "null_as_default")]
    pub resolver: String,

    // http
    #[serde(deserialize_with = "null_as_default")]
    pub headers: IndexMap<String, String>,
    #[serde(deserialize_with = "null_as_default")]
    pub raw_headers: String,
    pub raw_body: Option<String>,
    pub tls: Option<TlsCertificate>,
}

impl ResultData {
    /// Decodes the raw timings for a result of the given measurement type.
    pub fn timings(&self, kind: MeasurementType) -> Result<Timings, DecodeError> {
        match &self.timings_raw {
            Some(raw) => decode_timings(kind, raw),
            None => Ok(Timings::empty(kind)),
        }
    }
}

/// A traceroute or mtr hop. Only mtr fills `stats`, `asn` and `duplicate`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hop {
    #[serde(deserialize_with = "null_as_default")]
    pub resolved_hostname: String,
    #[serde(deserialize_with = "null_as_default")]
    pub resolved_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub timings: Vec<Rtt>,
    #[serde(deserialize_with = "numbers_skip_null")]
    pub stats: BTreeMap<String, f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub asn: Vec<u32>,
    #[serde(deserialize_with = "null_as_default")]
    pub duplicate: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DnsAnswer {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ttl: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub class: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TlsCertificate {
    #[serde(deserialize_with = "null_as_default")]
    pub authorized: bool,
    pub error: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    /// Distinguished name of the issuer, keyed by attribute (`CN`, `O`, `C`...).
    #[serde(deserialize_with = "null_as_default")]
    pub issuer: IndexMap<String, String>,
    #[serde(deserialize_with = "null_as_default")]
    pub subject: IndexMap<String, String>,
}

/// Reads a `null` as the default value of the field (empty string, empty list, zero...).
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The API reports `null` for statistics it could not compute, e.g. `avg` with 100% loss.
fn numbers_skip_null<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = Option::<BTreeMap<String, Option<f64>>>::deserialize(deserializer)?;
    Ok(map
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name, value)))
        .collect())
}
