use crate::error::{TsaggError, TsaggResult};
use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::fmt;

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// A point in time as seconds plus nanoseconds since the Unix epoch.
///
/// `nsec` is always in `0..1_000_000_000`, which keeps the derived ordering
/// chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RawTimespec")]
pub struct Timespec {
    sec: i64,
    nsec: i64,
}

#[derive(Deserialize)]
struct RawTimespec {
    sec: i64,
    nsec: i64,
}

impl TryFrom<RawTimespec> for Timespec {
    type Error = TsaggError;

    fn try_from(raw: RawTimespec) -> Result<Self, Self::Error> {
        Timespec::new(raw.sec, raw.nsec)
    }
}

impl Timespec {
    pub const ZERO: Timespec = Timespec { sec: 0, nsec: 0 };

    pub fn new(sec: i64, nsec: i64) -> TsaggResult<Self> {
        if !(0..NANOS_PER_SEC).contains(&nsec) {
            return Err(TsaggError::InvalidTimespec { sec, nsec });
        }
        Ok(Self { sec, nsec })
    }

    pub fn from_secs(sec: i64) -> Self {
        Self { sec, nsec: 0 }
    }

    pub fn from_millis(millis: i64) -> Self {
        Self {
            sec: millis.div_euclid(1000),
            nsec: millis.rem_euclid(1000) * 1_000_000,
        }
    }

    pub fn sec(&self) -> i64 {
        self.sec
    }

    pub fn nsec(&self) -> i64 {
        self.nsec
    }

    pub fn as_nanos(&self) -> i128 {
        self.sec as i128 * NANOS_PER_SEC as i128 + self.nsec as i128
    }

    /// Milliseconds since the epoch, saturating at the `i64` bounds.
    pub fn as_millis(&self) -> i64 {
        self.sec
            .saturating_mul(1000)
            .saturating_add(self.nsec / 1_000_000)
    }
}

impl fmt::Display for Timespec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::from_timestamp(self.sec, self.nsec as u32) {
            Some(dt) => write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => write!(f, "{}.{:09}", self.sec, self.nsec),
        }
    }
}
