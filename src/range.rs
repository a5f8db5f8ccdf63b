use crate::error::{TsaggError, TsaggResult};
use crate::timespec::Timespec;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesKey(pub String);

impl From<&str> for SeriesKey {
    fn from(s: &str) -> Self {
        SeriesKey(s.to_string())
    }
}

impl From<String> for SeriesKey {
    fn from(s: String) -> Self {
        SeriesKey(s)
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Half-open interval `[begin, end)` with `begin <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeRange")]
pub struct TimeRange {
    begin: Timespec,
    end: Timespec,
}

#[derive(Deserialize)]
struct RawTimeRange {
    begin: Timespec,
    end: Timespec,
}

impl TryFrom<RawTimeRange> for TimeRange {
    type Error = TsaggError;

    fn try_from(raw: RawTimeRange) -> Result<Self, Self::Error> {
        TimeRange::new(raw.begin, raw.end)
    }
}

impl TimeRange {
    pub fn new(begin: Timespec, end: Timespec) -> TsaggResult<Self> {
        if begin > end {
            return Err(TsaggError::InvalidTimeRange {
                begin: begin.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { begin, end })
    }

    pub fn from_millis(begin: i64, end: i64) -> TsaggResult<Self> {
        Self::new(Timespec::from_millis(begin), Timespec::from_millis(end))
    }

    pub fn begin(&self) -> Timespec {
        self.begin
    }

    pub fn end(&self) -> Timespec {
        self.end
    }

    pub fn contains(&self, ts: Timespec) -> bool {
        ts >= self.begin && ts < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}

/// Value predicate applied after the time bound.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Filter {
    #[default]
    None,
    DoubleInsideRange { min: f64, max: f64 },
    DoubleOutsideRange { min: f64, max: f64 },
}

impl Filter {
    pub fn accepts_double(&self, value: f64) -> bool {
        match *self {
            Filter::None => true,
            Filter::DoubleInsideRange { min, max } => value >= min && value <= max,
            Filter::DoubleOutsideRange { min, max } => value < min || value > max,
        }
    }
}

/// A selection over one series: a time interval plus an optional predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredRange {
    pub series: SeriesKey,
    pub range: TimeRange,
    #[serde(default)]
    pub filter: Filter,
}

impl FilteredRange {
    pub fn new(series: impl Into<SeriesKey>, range: TimeRange) -> Self {
        Self {
            series: series.into(),
            range,
            filter: Filter::None,
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }
}

impl fmt::Display for FilteredRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.series, self.range)?;
        if self.filter != Filter::None {
            write!(f, " where {:?}", self.filter)?;
        }
        Ok(())
    }
}
