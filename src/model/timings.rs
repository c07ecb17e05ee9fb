use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use thiserror::Error;

use crate::model::MeasurementType;

/// A single round-trip sample of a ping, traceroute or mtr result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rtt {
    /// RTT in milliseconds. If the packet was lost, it is None.
    #[serde(default)]
    pub rtt: Option<f64>,
}

/// Decoded `timings` of a probe result.
///
/// The wire shape depends on the measurement type: a list of RTT samples for
/// ping, traceroute and mtr, and named durations in milliseconds for dns and http.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Timings {
    Sequence(Vec<Rtt>),
    Mapping(BTreeMap<String, f64>),
}

impl Timings {
    /// Empty view of the form used by `kind`.
    pub fn empty(kind: MeasurementType) -> Self {
        if kind.has_named_timings() {
            Timings::Mapping(BTreeMap::new())
        } else {
            Timings::Sequence(Vec::new())
        }
    }

    pub fn as_sequence(&self) -> Option<&[Rtt]> {
        match self {
            Timings::Sequence(rtts) => Some(rtts),
            Timings::Mapping(_) => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<String, f64>> {
        match self {
            Timings::Sequence(_) => None,
            Timings::Mapping(map) => Some(map),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Timings::Sequence(rtts) => rtts.is_empty(),
            Timings::Mapping(map) => map.is_empty(),
        }
    }
}

#[derive(Debug, Error)]
#[error("invalid {kind} timings: {source}")]
pub struct DecodeError {
    pub kind: MeasurementType,
    #[source]
    pub source: serde_json::Error,
}

/// Decodes a raw `timings` payload according to the owning measurement's type.
///
/// Named durations may be `null` when a phase did not happen (e.g. no TLS
/// handshake); those entries are left out of the mapping.
pub fn decode_timings(kind: MeasurementType, raw: &RawValue) -> Result<Timings, DecodeError> {
    let json = raw.get();
    let decoded = if kind.has_named_timings() {
        serde_json::from_str::<Option<BTreeMap<String, Option<f64>>>>(json).map(|map| {
            Timings::Mapping(
                map.unwrap_or_default()
                    .into_iter()
                    .filter_map(|(name, value)| value.map(|value| (name, value)))
                    .collect(),
            )
        })
    } else {
        serde_json::from_str::<Option<Vec<Rtt>>>(json)
            .map(|rtts| Timings::Sequence(rtts.unwrap_or_default()))
    };

    decoded.map_err(|source| DecodeError { kind, source })
}
