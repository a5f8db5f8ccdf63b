use crate::error::{TsaggError, TsaggResult};
use crate::point::{BlobPoint, DoublePoint, ResultPoint};
use crate::query::AggregationKind;
use crate::range::FilteredRange;
use std::fmt;
use std::sync::Arc;

/// Raw count reported for a query that has not been executed yet.
pub const PENDING_COUNT: i64 = -1;

/// Lifecycle of an aggregation query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<P> {
    Pending,
    Completed { count: u64, result: P },
}

/// A single aggregation over a filtered range, either waiting for an engine
/// (pending) or carrying the engine's answer (completed).
///
/// Instances never change after construction. Completing a pending query
/// yields a new instance that shares the same kind and range.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationQuery<P> {
    kind: AggregationKind,
    range: Arc<FilteredRange>,
    state: QueryState<P>,
}

pub type DoubleAggregation = AggregationQuery<DoublePoint>;
pub type BlobAggregation = AggregationQuery<BlobPoint>;

impl<P: ResultPoint> AggregationQuery<P> {
    pub fn pending(range: impl Into<Arc<FilteredRange>>, kind: AggregationKind) -> Self {
        Self {
            kind,
            range: range.into(),
            state: QueryState::Pending,
        }
    }

    /// Builds a pending query from loosely typed parts, failing on an absent
    /// range or an unrecognized kind code.
    pub fn try_pending(range: Option<FilteredRange>, kind_code: i64) -> TsaggResult<Self> {
        let range = range.ok_or(TsaggError::MissingRange)?;
        let kind = AggregationKind::try_from(kind_code)?;
        Ok(Self::pending(range, kind))
    }

    /// The result is trusted as supplied; nothing is checked against the range or kind.
    pub fn completed(
        range: impl Into<Arc<FilteredRange>>,
        kind: AggregationKind,
        count: u64,
        result: P,
    ) -> Self {
        Self {
            kind,
            range: range.into(),
            state: QueryState::Completed { count, result },
        }
    }

    /// Accepts the sentinel representation: a count of `-1` with no result
    /// is pending, a non-negative count with a result is completed. Any
    /// other combination is rejected.
    pub fn from_raw_parts(
        range: Option<FilteredRange>,
        kind_code: i64,
        count: i64,
        result: Option<P>,
    ) -> TsaggResult<Self> {
        let range = range.ok_or(TsaggError::MissingRange)?;
        let kind = AggregationKind::try_from(kind_code)?;

        match (count, result) {
            (PENDING_COUNT, None) => Ok(Self::pending(range, kind)),
            (count, Some(result)) if count >= 0 => {
                Ok(Self::completed(range, kind, count as u64, result))
            }
            (count, result) => Err(TsaggError::InconsistentState {
                count,
                has_result: result.is_some(),
            }),
        }
    }

    /// Produces the completed counterpart of this query. `self` is left as is.
    pub fn complete(&self, count: u64, result: P) -> Self {
        Self {
            kind: self.kind,
            range: Arc::clone(&self.range),
            state: QueryState::Completed { count, result },
        }
    }

    pub fn kind(&self) -> AggregationKind {
        self.kind
    }

    pub fn filtered_range(&self) -> &FilteredRange {
        &self.range
    }

    pub fn shared_range(&self) -> &Arc<FilteredRange> {
        &self.range
    }

    pub fn state(&self) -> &QueryState<P> {
        &self.state
    }

    pub fn count(&self) -> Option<u64> {
        match self.state {
            QueryState::Pending => None,
            QueryState::Completed { count, .. } => Some(count),
        }
    }

    /// Count in sentinel form: `-1` while pending.
    pub fn raw_count(&self) -> i64 {
        match self.state {
            QueryState::Pending => PENDING_COUNT,
            QueryState::Completed { count, .. } => i64::try_from(count).unwrap_or(i64::MAX),
        }
    }

    pub fn result(&self) -> Option<&P> {
        match &self.state {
            QueryState::Pending => None,
            QueryState::Completed { result, .. } => Some(result),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, QueryState::Pending)
    }

    pub fn is_completed(&self) -> bool {
        !self.is_pending()
    }

    /// True when the query completed over at least one sample.
    pub fn has_samples(&self) -> bool {
        self.count().is_some_and(|count| count > 0)
    }

    /// The result, only when it was computed from at least one sample.
    /// A zero-count result is the engine's placeholder and is skipped here.
    pub fn sampled_result(&self) -> Option<&P> {
        match &self.state {
            QueryState::Completed { count, result } if *count > 0 => Some(result),
            _ => None,
        }
    }

    pub fn into_result(self) -> Option<(u64, P)> {
        match self.state {
            QueryState::Pending => None,
            QueryState::Completed { count, result } => Some((count, result)),
        }
    }
}

impl<P: ResultPoint + fmt::Display> fmt::Display for AggregationQuery<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.range)?;
        match &self.state {
            QueryState::Pending => f.write_str(" pending"),
            QueryState::Completed { count: 0, .. } => f.write_str(" = no data over 0 samples"),
            QueryState::Completed { count, result } => {
                write!(f, " = {} over {} samples", result, count)
            }
        }
    }
}
