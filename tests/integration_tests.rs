use async_trait::async_trait;
use std::sync::Arc;
use tsagg::{
    AggregationEngine, AggregationKind, BlobAggregation, BlobPoint, DoubleAggregation,
    DoublePoint, FilteredRange, MemoryEngine, ResultPoint, SeriesKey, TimeRange, Timespec,
    TsaggConfig, TsaggError, TsaggResult,
};

fn temp_range() -> FilteredRange {
    FilteredRange::new("temp", TimeRange::from_millis(100, 200).unwrap())
}

async fn setup_engine(series: &str, values: &[f64]) -> MemoryEngine {
    let engine = MemoryEngine::new(&TsaggConfig::default());
    for (i, &value) in values.iter().enumerate() {
        let point = DoublePoint::new(Timespec::from_millis(100 + i as i64 * 10), value);
        engine.insert_double(SeriesKey::from(series), point).await.unwrap();
    }
    engine
}

/// Engine that always fails, standing in for an unavailable store.
struct UnavailableEngine;

#[async_trait]
impl AggregationEngine for UnavailableEngine {
    async fn aggregate_double(&self, query: &DoubleAggregation) -> TsaggResult<DoubleAggregation> {
        Err(TsaggError::SeriesNotFound(query.filtered_range().series.to_string()))
    }

    async fn aggregate_blob(&self, query: &BlobAggregation) -> TsaggResult<BlobAggregation> {
        Err(TsaggError::SeriesNotFound(query.filtered_range().series.to_string()))
    }
}

/// Engine that answers with fixed values, the way a remote store would.
struct FixedEngine {
    count: u64,
    result: DoublePoint,
}

#[async_trait]
impl AggregationEngine for FixedEngine {
    async fn aggregate_double(&self, query: &DoubleAggregation) -> TsaggResult<DoubleAggregation> {
        Ok(query.complete(self.count, self.result.clone()))
    }

    async fn aggregate_blob(&self, query: &BlobAggregation) -> TsaggResult<BlobAggregation> {
        Ok(query.complete(0, BlobPoint::no_data()))
    }
}

#[test]
fn test_pending_sum_over_temp() {
    let query = DoubleAggregation::pending(temp_range(), AggregationKind::Sum);

    assert_eq!(query.kind(), AggregationKind::Sum);
    assert_eq!(query.filtered_range(), &temp_range());
    assert_eq!(query.raw_count(), -1);
    assert!(query.result().is_none());
}

#[tokio::test]
async fn test_engine_completion_leaves_pending_unchanged() {
    let engine = FixedEngine {
        count: 42,
        result: DoublePoint::new(Timespec::from_millis(199), 87.5),
    };
    let pending = DoubleAggregation::pending(temp_range(), AggregationKind::Sum);

    let completed = engine.aggregate_double(&pending).await.unwrap();

    assert_eq!(completed.kind(), AggregationKind::Sum);
    assert_eq!(completed.filtered_range(), &temp_range());
    assert_eq!(completed.raw_count(), 42);
    assert_eq!(
        completed.result(),
        Some(&DoublePoint::new(Timespec::from_millis(199), 87.5))
    );
    assert_eq!(pending.raw_count(), -1);
    assert!(pending.result().is_none());
}

#[tokio::test]
async fn test_zero_sample_result_is_completed() {
    let engine = setup_engine("temp", &[]).await;
    let pending = DoubleAggregation::pending(temp_range(), AggregationKind::ArithmeticMean);

    // No samples were inserted, so the series does not exist yet.
    assert!(engine.aggregate_double(&pending).await.is_err());

    let engine = setup_engine("temp", &[1.0]).await;
    let later = FilteredRange::new("temp", TimeRange::from_millis(500, 600).unwrap());
    let completed = engine
        .aggregate_double(&DoubleAggregation::pending(later, AggregationKind::ArithmeticMean))
        .await
        .unwrap();

    assert!(completed.is_completed());
    assert_eq!(completed.raw_count(), 0);
    assert_eq!(completed.result(), Some(&DoublePoint::no_data()));
    assert!(completed.sampled_result().is_none());
}

#[tokio::test]
async fn test_engine_failure_produces_no_completed_query() {
    let engine: Arc<dyn AggregationEngine> = Arc::new(UnavailableEngine);
    let pending = DoubleAggregation::pending(temp_range(), AggregationKind::Max);

    let outcome = engine.aggregate_double(&pending).await;

    assert!(matches!(outcome, Err(TsaggError::SeriesNotFound(name)) if name == "temp"));
    assert!(pending.is_pending());
}

#[tokio::test]
async fn test_memory_engine_all_kinds() {
    let engine = setup_engine("temp", &[10.0, 20.0, 30.0, 40.0, 50.0]).await;

    let expected = vec![
        (AggregationKind::Sum, 150.0),
        (AggregationKind::ArithmeticMean, 30.0),
        (AggregationKind::Min, 10.0),
        (AggregationKind::Max, 50.0),
        (AggregationKind::Count, 5.0),
        (AggregationKind::First, 10.0),
        (AggregationKind::Last, 50.0),
        (AggregationKind::Spread, 40.0),
        (AggregationKind::PopulationVariance, 200.0),
    ];

    for (kind, value) in expected {
        let pending = DoubleAggregation::pending(temp_range(), kind);
        let completed = engine.aggregate_double(&pending).await.unwrap();
        assert_eq!(completed.count(), Some(5), "{} should see 5 samples", kind);
        assert_eq!(completed.result().unwrap().value, value, "{} should be {}", kind, value);
    }
}

#[tokio::test]
async fn test_trait_object_engine() {
    let memory = setup_engine("temp", &[1.0, 2.0]).await;
    let engines: Vec<Arc<dyn AggregationEngine>> = vec![
        Arc::new(memory),
        Arc::new(FixedEngine {
            count: 2,
            result: DoublePoint::new(Timespec::from_millis(100), 3.0),
        }),
    ];

    let pending = DoubleAggregation::pending(temp_range(), AggregationKind::Sum);
    for engine in engines {
        let completed = engine.aggregate_double(&pending).await.unwrap();
        assert_eq!(completed.count(), Some(2));
        assert_eq!(completed.result().unwrap().value, 3.0);
        assert!(Arc::ptr_eq(completed.shared_range(), pending.shared_range()));
    }
}

#[tokio::test]
async fn test_completed_query_shared_across_tasks() {
    let engine = setup_engine("temp", &[1.0, 2.0, 3.0]).await;
    let pending = DoubleAggregation::pending(temp_range(), AggregationKind::Sum);
    let completed = Arc::new(engine.aggregate_double(&pending).await.unwrap());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let completed = Arc::clone(&completed);
        handles.push(tokio::spawn(async move {
            (completed.count(), completed.result().map(|p| p.value))
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), (Some(3), Some(6.0)));
    }
}

#[test]
fn test_blocking_execution() {
    let engine = tokio_test::block_on(setup_engine("temp", &[4.0, 8.0]));
    let pending = DoubleAggregation::pending(temp_range(), AggregationKind::AbsMax);

    let completed = tokio_test::block_on(engine.aggregate_double(&pending)).unwrap();

    assert_eq!(
        completed.result(),
        Some(&DoublePoint::new(Timespec::from_millis(110), 8.0))
    );
}

#[tokio::test]
async fn test_blob_aggregation_round() {
    let engine = MemoryEngine::new(&TsaggConfig::default());
    let series = SeriesKey::from("logs");
    for (i, line) in ["start", "warn", "stop"].iter().enumerate() {
        let point = BlobPoint::new(Timespec::from_millis(100 + i as i64), *line);
        engine.insert_blob(series.clone(), point).await.unwrap();
    }

    let range = FilteredRange::new("logs", TimeRange::from_millis(100, 102).unwrap());
    let first = engine
        .aggregate_blob(&BlobAggregation::pending(range.clone(), AggregationKind::First))
        .await
        .unwrap();
    let count = engine
        .aggregate_blob(&BlobAggregation::pending(range, AggregationKind::Count))
        .await
        .unwrap();

    assert_eq!(first.result().unwrap().content, b"start");
    assert_eq!(count.count(), Some(2));
    assert_eq!(count.result().unwrap().content, b"2");
}
