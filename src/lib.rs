pub mod engine;
pub mod error;
pub mod point;
pub mod query;
pub mod range;
pub mod timespec;

pub use engine::{AggregationEngine, MemoryEngine};
pub use error::{TsaggError, TsaggResult};
pub use point::{BlobPoint, DoublePoint, ResultPoint};
pub use query::{AggregationKind, AggregationQuery, BlobAggregation, DoubleAggregation, QueryState};
pub use range::{Filter, FilteredRange, SeriesKey, TimeRange};
pub use timespec::Timespec;

#[derive(Debug, Clone)]
pub struct TsaggConfig {
    pub max_points_per_series: usize,
    /// Aggregating an unknown series is an error rather than an empty result.
    pub strict_series: bool,
    pub log_filter: String,
}

impl Default for TsaggConfig {
    fn default() -> Self {
        Self {
            max_points_per_series: 1_000_000,
            strict_series: true,
            log_filter: "info".to_string(),
        }
    }
}

impl TsaggConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(max_points) = std::env::var("TSAGG_MAX_POINTS_PER_SERIES") {
            config.max_points_per_series =
                max_points.parse().unwrap_or(config.max_points_per_series);
        }

        if let Ok(strict) = std::env::var("TSAGG_STRICT_SERIES") {
            config.strict_series = strict.parse().unwrap_or(true);
        }

        if let Ok(filter) = std::env::var("TSAGG_LOG") {
            config.log_filter = filter;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = TsaggConfig::default();
        assert_eq!(config.max_points_per_series, 1_000_000);
        assert!(config.strict_series);
        assert_eq!(config.log_filter, "info");
    }
}
