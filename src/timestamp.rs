//! Decoding of the NexTrip `/Date(<millis><offset>)/` timestamp encoding.
//!
//! The service emits departure times as JSON strings such as
//! `"\/Date(1700000000000-0500)\/"`. Once the JSON escapes are removed the text
//! is `/Date(1700000000000-0500)/`: epoch milliseconds followed by a UTC offset.
//! Only the millisecond count is used. The offset is checked for shape and then
//! dropped, it is never applied to the instant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

const PREFIX: &str = "/Date(";
const SUFFIX: &str = ")/";
const NULL_TOKEN: &str = "null";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("expected a /Date(...)/ value, got {0:?}")]
    MissingWrapper(String),

    #[error("invalid millisecond count {0:?}")]
    InvalidMillis(String),

    #[error("invalid UTC offset {0:?}")]
    InvalidOffset(String),

    #[error("millisecond count {0} is out of range")]
    OutOfRange(i64),
}

/// A point in time decoded from the vendor encoding.
///
/// A `null` on the wire decodes to the unset value, which is also the
/// [`Default`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VendorTimestamp(Option<DateTime<Utc>>);

impl VendorTimestamp {
    pub const UNSET: VendorTimestamp = VendorTimestamp(None);

    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(Some(at))
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        self.0
    }

    pub fn is_unset(&self) -> bool {
        self.0.is_none()
    }
}

impl fmt::Display for VendorTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(at) => write!(f, "{}", at.to_rfc3339()),
            None => f.write_str(NULL_TOKEN),
        }
    }
}

/// Decodes the JSON-unescaped text of a vendor timestamp.
///
/// # Errors
///
/// Fails when the `/Date(` `)/` wrapper is missing, when the millisecond
/// count is not a base-10 integer, when a trailing offset is not of the form
/// `+HHMM`/`-HHMM`, or when the instant cannot be represented.
pub fn decode_vendor_timestamp(text: &str) -> Result<VendorTimestamp, TimestampError> {
    if text == NULL_TOKEN {
        return Ok(VendorTimestamp::UNSET);
    }

    let body = text
        .strip_prefix(PREFIX)
        .and_then(|rest| rest.strip_suffix(SUFFIX))
        .ok_or_else(|| TimestampError::MissingWrapper(text.to_string()))?;

    let (millis, offset) = split_offset(body);

    // TODO: apply the offset once we confirm whether the service already
    // reports UTC millis or local wall-clock millis.
    if let Some(offset) = offset {
        if !is_utc_offset(offset) {
            return Err(TimestampError::InvalidOffset(offset.to_string()));
        }
    }

    let millis: i64 = millis
        .parse()
        .map_err(|_| TimestampError::InvalidMillis(millis.to_string()))?;

    DateTime::from_timestamp_millis(millis)
        .map(VendorTimestamp::from_datetime)
        .ok_or(TimestampError::OutOfRange(millis))
}

/// Splits `1700000000000-0500` at the first sign that is not a leading one.
fn split_offset(body: &str) -> (&str, Option<&str>) {
    match body
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == '+' || *c == '-')
    {
        Some((i, _)) => (&body[..i], Some(&body[i..])),
        None => (body, None),
    }
}

fn is_utc_offset(offset: &str) -> bool {
    let mut chars = offset.chars();
    matches!(chars.next(), Some('+' | '-'))
        && offset.len() == 5
        && chars.all(|c| c.is_ascii_digit())
}

impl<'de> Deserialize<'de> for VendorTimestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(VendorTimestamp::UNSET),
            Some(text) => decode_vendor_timestamp(&text).map_err(serde::de::Error::custom),
        }
    }
}

impl Serialize for VendorTimestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}
