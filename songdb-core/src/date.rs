//! Tick-based dates
//!
//! Dates are stored as a signed 64-bit count of 100ns ticks since
//! 0001-01-01T00:00:00Z (proleptic Gregorian, UTC).
//!
//! The sub-second part of the tick count is handed to the timestamp as
//! nanoseconds without rescaling from 100ns units. Output only carries whole
//! seconds, so this never shows in the dump, but the instant is kept exactly
//! as the original tool computed it.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// Ticks in one second
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Ticks in one day
pub const TICKS_PER_DAY: i64 = 86_400 * TICKS_PER_SECOND;

/// Unix time of 0001-01-01T00:00:00Z
pub const TICK_EPOCH_UNIX_SECONDS: i64 = -62_135_596_800;

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// A decoded date: the raw tick count and the instant derived from it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    ticks: i64,
    instant: DateTime<Utc>,
}

impl Timestamp {
    /// Convert a tick count, or `None` if the instant cannot be represented
    pub fn from_ticks(ticks: i64) -> Option<Self> {
        let mut secs = ticks / TICKS_PER_SECOND + TICK_EPOCH_UNIX_SECONDS;
        let mut nanos = ticks % TICKS_PER_SECOND;
        if nanos < 0 {
            secs -= 1;
            nanos += NANOS_PER_SECOND;
        }

        let instant = DateTime::<Utc>::from_timestamp(secs, nanos as u32)?;
        Some(Self { ticks, instant })
    }

    pub fn ticks(&self) -> i64 {
        self.ticks
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    /// RFC 3339 with whole seconds and a `Z` suffix, e.g. `2014-03-09T17:25:41Z`
    pub fn to_rfc3339(&self) -> String {
        self.instant.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}
