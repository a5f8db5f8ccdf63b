use crate::error::TsaggError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aggregation function selector. Codes are stable and exchanged with engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationKind {
    First,
    Last,
    Min,
    Max,
    AbsMin,
    AbsMax,
    Spread,
    Sum,
    Count,
    ArithmeticMean,
    PopulationVariance,
    PopulationStdDev,
}

impl AggregationKind {
    pub const ALL: [AggregationKind; 12] = [
        AggregationKind::First,
        AggregationKind::Last,
        AggregationKind::Min,
        AggregationKind::Max,
        AggregationKind::AbsMin,
        AggregationKind::AbsMax,
        AggregationKind::Spread,
        AggregationKind::Sum,
        AggregationKind::Count,
        AggregationKind::ArithmeticMean,
        AggregationKind::PopulationVariance,
        AggregationKind::PopulationStdDev,
    ];

    pub fn code(self) -> i64 {
        match self {
            AggregationKind::First => 0,
            AggregationKind::Last => 1,
            AggregationKind::Min => 2,
            AggregationKind::Max => 3,
            AggregationKind::AbsMin => 4,
            AggregationKind::AbsMax => 5,
            AggregationKind::Spread => 6,
            AggregationKind::Sum => 7,
            AggregationKind::Count => 8,
            AggregationKind::ArithmeticMean => 9,
            AggregationKind::PopulationVariance => 10,
            AggregationKind::PopulationStdDev => 11,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AggregationKind::First => "first",
            AggregationKind::Last => "last",
            AggregationKind::Min => "min",
            AggregationKind::Max => "max",
            AggregationKind::AbsMin => "abs_min",
            AggregationKind::AbsMax => "abs_max",
            AggregationKind::Spread => "spread",
            AggregationKind::Sum => "sum",
            AggregationKind::Count => "count",
            AggregationKind::ArithmeticMean => "arithmetic_mean",
            AggregationKind::PopulationVariance => "population_variance",
            AggregationKind::PopulationStdDev => "population_stddev",
        }
    }

    /// Blob columns only support kinds that select or count samples.
    pub fn supports_blob(self) -> bool {
        matches!(
            self,
            AggregationKind::First | AggregationKind::Last | AggregationKind::Count
        )
    }
}

impl TryFrom<i64> for AggregationKind {
    type Error = TsaggError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        AggregationKind::ALL
            .into_iter()
            .find(|kind| kind.code() == code)
            .ok_or(TsaggError::UnknownAggregationKind(code))
    }
}

impl FromStr for AggregationKind {
    type Err = TsaggError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let kind = match normalized.as_str() {
            "mean" | "avg" => AggregationKind::ArithmeticMean,
            "variance" => AggregationKind::PopulationVariance,
            "stddev" => AggregationKind::PopulationStdDev,
            other => AggregationKind::ALL
                .into_iter()
                .find(|kind| kind.name() == other)
                .ok_or_else(|| TsaggError::UnknownAggregationName(s.to_string()))?,
        };
        Ok(kind)
    }
}

impl fmt::Display for AggregationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
