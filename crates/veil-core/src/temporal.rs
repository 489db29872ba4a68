//! # Temporal Types — UTC-Only Timestamps
//!
//! `Timestamp` is a UTC-only timestamp truncated to seconds precision.
//! Token expiry times come from the server as epoch seconds and are
//! compared locally; a single normalized representation avoids offset
//! ambiguity between the wire format and stored tokens.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing or constructing a [`Timestamp`].
#[derive(Error, Debug)]
pub enum TimestampError {
    /// The input is not a valid RFC 3339 timestamp.
    #[error("invalid RFC 3339 timestamp {input:?}: {reason}")]
    InvalidFormat {
        /// The rejected input.
        input: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// The epoch value is outside the representable range.
    #[error("invalid epoch seconds: {0}")]
    InvalidEpoch(i64),
}

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// From a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// From a Unix epoch timestamp in seconds.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, TimestampError> {
        let dt = DateTime::from_timestamp(secs, 0).ok_or(TimestampError::InvalidEpoch(secs))?;
        Ok(Self(dt))
    }

    /// Parse from an RFC 3339 string, accepting any offset and
    /// normalizing to UTC.
    pub fn parse(s: &str) -> Result<Self, TimestampError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| TimestampError::InvalidFormat {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Render as ISO 8601 with `Z` suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision.
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
