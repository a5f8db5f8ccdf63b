use thiserror::Error;

#[derive(Error, Debug)]
pub enum TsaggError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Aggregation query requires a filtered range")]
    MissingRange,

    #[error("Unknown aggregation kind code: {0}")]
    UnknownAggregationKind(i64),

    #[error("Unknown aggregation kind name: {0}")]
    UnknownAggregationName(String),

    #[error("Inconsistent aggregation state: count {count}, result present: {has_result}")]
    InconsistentState { count: i64, has_result: bool },

    #[error("Invalid timespec: {sec}s {nsec}ns")]
    InvalidTimespec { sec: i64, nsec: i64 },

    #[error("Invalid time range: begin {begin} > end {end}")]
    InvalidTimeRange { begin: String, end: String },

    #[error("Time series not found: {0}")]
    SeriesNotFound(String),

    #[error("Time series {series} does not hold {expected} samples")]
    SeriesTypeMismatch { series: String, expected: &'static str },

    #[error("Aggregation {kind} is not supported on {column} columns")]
    UnsupportedAggregation { kind: String, column: &'static str },

    #[error("Time series {series} exceeds {limit} points")]
    CapacityExceeded { series: String, limit: usize },
}

pub type TsaggResult<T> = Result<T, TsaggError>;
