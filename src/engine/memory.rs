use crate::engine::{functions, AggregationEngine};
use crate::error::{TsaggError, TsaggResult};
use crate::point::{BlobPoint, DoublePoint, ResultPoint};
use crate::query::{BlobAggregation, DoubleAggregation};
use crate::range::{FilteredRange, SeriesKey};
use crate::timespec::Timespec;
use crate::TsaggConfig;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::{debug, warn};

enum Column {
    Double(BTreeMap<Timespec, f64>),
    Blob(BTreeMap<Timespec, Vec<u8>>),
}

impl Column {
    fn len(&self) -> usize {
        match self {
            Column::Double(points) => points.len(),
            Column::Blob(points) => points.len(),
        }
    }
}

/// Aggregation engine over series held in process memory.
pub struct MemoryEngine {
    series: RwLock<HashMap<String, Column>>,
    max_points_per_series: usize,
    strict_series: bool,
}

impl MemoryEngine {
    pub fn new(config: &TsaggConfig) -> Self {
        Self {
            series: RwLock::new(HashMap::new()),
            max_points_per_series: config.max_points_per_series,
            strict_series: config.strict_series,
        }
    }

    /// Inserts a sample, replacing any sample already stored at the same timestamp.
    /// A rejected insert leaves the series map untouched.
    pub async fn insert_double(&self, series: SeriesKey, point: DoublePoint) -> TsaggResult<()> {
        let limit = self.max_points_per_series;
        let mut all = self.series.write().await;

        match all.get_mut(&series.0) {
            Some(Column::Double(points)) => {
                check_capacity(points, &point.timestamp, &series, limit)?;
                points.insert(point.timestamp, point.value);
                Ok(())
            }
            Some(Column::Blob(_)) => Err(TsaggError::SeriesTypeMismatch {
                series: series.0,
                expected: DoublePoint::COLUMN,
            }),
            None => {
                let mut points = BTreeMap::new();
                check_capacity(&points, &point.timestamp, &series, limit)?;
                points.insert(point.timestamp, point.value);
                all.insert(series.0, Column::Double(points));
                Ok(())
            }
        }
    }

    pub async fn insert_blob(&self, series: SeriesKey, point: BlobPoint) -> TsaggResult<()> {
        let limit = self.max_points_per_series;
        let mut all = self.series.write().await;

        match all.get_mut(&series.0) {
            Some(Column::Blob(points)) => {
                check_capacity(points, &point.timestamp, &series, limit)?;
                points.insert(point.timestamp, point.content);
                Ok(())
            }
            Some(Column::Double(_)) => Err(TsaggError::SeriesTypeMismatch {
                series: series.0,
                expected: BlobPoint::COLUMN,
            }),
            None => {
                let mut points = BTreeMap::new();
                check_capacity(&points, &point.timestamp, &series, limit)?;
                points.insert(point.timestamp, point.content);
                all.insert(series.0, Column::Blob(points));
                Ok(())
            }
        }
    }

    pub async fn series_count(&self) -> usize {
        self.series.read().await.len()
    }

    pub async fn point_count(&self, series: &SeriesKey) -> Option<usize> {
        self.series.read().await.get(&series.0).map(Column::len)
    }

    async fn select_doubles(&self, selection: &FilteredRange) -> TsaggResult<Vec<DoublePoint>> {
        let all = self.series.read().await;
        match all.get(&selection.series.0) {
            Some(Column::Double(points)) => {
                let range = selection.range;
                if range.is_empty() {
                    return Ok(Vec::new());
                }
                Ok(points
                    .range(range.begin()..range.end())
                    .filter(|(_, value)| selection.filter.accepts_double(**value))
                    .map(|(ts, value)| DoublePoint::new(*ts, *value))
                    .collect())
            }
            Some(Column::Blob(_)) => Err(TsaggError::SeriesTypeMismatch {
                series: selection.series.0.clone(),
                expected: DoublePoint::COLUMN,
            }),
            None => self.missing_series(&selection.series),
        }
    }

    async fn select_blobs(&self, selection: &FilteredRange) -> TsaggResult<Vec<BlobPoint>> {
        let all = self.series.read().await;
        match all.get(&selection.series.0) {
            Some(Column::Blob(points)) => {
                let range = selection.range;
                if range.is_empty() {
                    return Ok(Vec::new());
                }
                Ok(points
                    .range(range.begin()..range.end())
                    .map(|(ts, content)| BlobPoint::new(*ts, content.clone()))
                    .collect())
            }
            Some(Column::Double(_)) => Err(TsaggError::SeriesTypeMismatch {
                series: selection.series.0.clone(),
                expected: BlobPoint::COLUMN,
            }),
            None => self.missing_series(&selection.series),
        }
    }

    fn missing_series<T>(&self, series: &SeriesKey) -> TsaggResult<Vec<T>> {
        if self.strict_series {
            Err(TsaggError::SeriesNotFound(series.0.clone()))
        } else {
            Ok(Vec::new())
        }
    }
}

fn check_capacity<V>(
    points: &BTreeMap<Timespec, V>,
    timestamp: &Timespec,
    series: &SeriesKey,
    limit: usize,
) -> TsaggResult<()> {
    if points.len() >= limit && !points.contains_key(timestamp) {
        return Err(TsaggError::CapacityExceeded {
            series: series.0.clone(),
            limit,
        });
    }
    Ok(())
}

#[async_trait]
impl AggregationEngine for MemoryEngine {
    async fn aggregate_double(&self, query: &DoubleAggregation) -> TsaggResult<DoubleAggregation> {
        let selection = query.filtered_range();
        let samples = self.select_doubles(selection).await.map_err(|e| {
            warn!("Aggregation {} over {} failed: {}", query.kind(), selection, e);
            e
        })?;

        let begin = selection.range.begin();
        let (count, result) = functions::aggregate_doubles(&samples, query.kind(), begin);
        debug!("Aggregated {} over {}: {} samples", query.kind(), selection, count);

        Ok(query.complete(count, result))
    }

    async fn aggregate_blob(&self, query: &BlobAggregation) -> TsaggResult<BlobAggregation> {
        let selection = query.filtered_range();
        let outcome = self.select_blobs(selection).await.and_then(|samples| {
            functions::aggregate_blobs(&samples, query.kind(), selection.range.begin())
        });

        match outcome {
            Ok((count, result)) => {
                debug!("Aggregated {} over {}: {} samples", query.kind(), selection, count);
                Ok(query.complete(count, result))
            }
            Err(e) => {
                warn!("Aggregation {} over {} failed: {}", query.kind(), selection, e);
                Err(e)
            }
        }
    }
}
