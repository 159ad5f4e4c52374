//! Transaction record model and wire event decoding.
//!
//! Wire events arrive as one JSON object per stream frame:
//! `{ id, amount, location, user_id, time, is_fraud }`. The backend emits
//! `time` as a zone-less local ISO string; that ambiguity is carried through
//! as [`chrono::NaiveDateTime`] rather than guessed away.

use chrono::NaiveDateTime;
use serde::Deserialize;
use std::fmt;

use crate::traits::error::{FeedError, Result};

/// Wire timestamp format: local time, no zone suffix, optional fraction
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Opaque transaction identifier, stable across redelivery
///
/// The backend emits its database key here, but nothing downstream may
/// assume numeric form or monotonicity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TxId(String);

impl TxId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-negative monetary amount in minor units (hundredths)
///
/// Amounts never pass through binary floats: wire numbers are kept as their
/// decimal text and converted digit-wise, so `100.10` stays exactly 10010.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    pub const fn from_minor_units(minor: i64) -> Self {
        Self(minor)
    }

    pub fn minor_units(&self) -> i64 {
        self.0
    }

    /// Parse a decimal amount string with at most two fractional digits
    ///
    /// Rejects negatives, signs, exponents and fractions finer than the
    /// minor unit; all of those are data-quality errors on this feed.
    pub fn parse(text: &str) -> Result<Self> {
        parse_minor_units(text.trim())
            .map(Self)
            .ok_or_else(|| FeedError::Decode(format!("invalid amount: {text:?}")))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

fn parse_minor_units(text: &str) -> Option<i64> {
    let (whole, frac) = match text.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (text, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if frac.len() > 2 {
        return None;
    }

    let whole_units: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().ok()?
    };
    let frac_units: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().ok()? * 10,
        _ => frac.parse().ok()?,
    };

    whole_units.checked_mul(100)?.checked_add(frac_units)
}

/// Transaction location: the known codes plus a pass-through for values this
/// build has never seen (forward compatibility — never reject)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    NewYork,
    SanFrancisco,
    LosAngeles,
    Chicago,
    Houston,
    Other(String),
}

impl Location {
    pub fn from_code(code: &str) -> Self {
        match code {
            "New York" => Location::NewYork,
            "San Francisco" => Location::SanFrancisco,
            "Los Angeles" => Location::LosAngeles,
            "Chicago" => Location::Chicago,
            "Houston" => Location::Houston,
            other => Location::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Location::NewYork => "New York",
            Location::SanFrancisco => "San Francisco",
            Location::LosAngeles => "Los Angeles",
            Location::Chicago => "Chicago",
            Location::Houston => "Houston",
            Location::Other(code) => code,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A received or submitted transaction with its fraud verdict
///
/// Immutable once decoded: a redelivered `id` replaces the whole record in
/// the store, fields are never patched in place.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub id: TxId,
    pub amount: Amount,
    pub location: Location,
    pub user_id: String,
    pub timestamp: NaiveDateTime,
    /// `None` while the scoring backend has not attached a verdict yet
    pub is_fraud: Option<bool>,
}

/// Raw deserialization target for a wire event
///
/// `id` is taken as a loose JSON value because the backend emits its integer
/// database key while the contract only promises an opaque identifier.
#[derive(Debug, Deserialize)]
struct WireTransaction {
    id: serde_json::Value,
    amount: serde_json::Number,
    location: String,
    user_id: String,
    time: String,
    #[serde(default)]
    is_fraud: Option<bool>,
}

/// Decode one wire event payload into a [`TransactionRecord`]
///
/// Any malformed payload (bad JSON, missing fields, invalid amount or
/// timestamp) is a [`FeedError::Decode`]; callers drop the event and move on.
pub fn decode_event(payload: &str) -> Result<TransactionRecord> {
    let wire: WireTransaction = serde_json::from_str(payload)
        .map_err(|e| FeedError::Decode(format!("malformed event payload: {e}")))?;

    let id = match wire.id {
        serde_json::Value::String(id) => TxId::new(id),
        serde_json::Value::Number(id) => TxId::new(id.to_string()),
        other => {
            return Err(FeedError::Decode(format!(
                "unsupported id representation: {other}"
            )))
        }
    };

    let amount = Amount::parse(&wire.amount.to_string())?;

    let timestamp = NaiveDateTime::parse_from_str(&wire.time, TIME_FORMAT)
        .map_err(|e| FeedError::Decode(format!("invalid time {:?}: {e}", wire.time)))?;

    Ok(TransactionRecord {
        id,
        amount,
        location: Location::from_code(&wire.location),
        user_id: wire.user_id,
        timestamp,
        is_fraud: wire.is_fraud,
    })
}
