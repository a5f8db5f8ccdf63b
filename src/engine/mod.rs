pub mod functions;
pub mod memory;

use crate::error::TsaggResult;
use crate::query::{BlobAggregation, DoubleAggregation};
use async_trait::async_trait;

pub use memory::MemoryEngine;

/// Executes aggregation queries.
///
/// On success the returned query is completed and shares the request's kind
/// and range. On failure only an error is returned; the request itself is
/// never modified.
#[async_trait]
pub trait AggregationEngine: Send + Sync {
    async fn aggregate_double(&self, query: &DoubleAggregation) -> TsaggResult<DoubleAggregation>;

    async fn aggregate_blob(&self, query: &BlobAggregation) -> TsaggResult<BlobAggregation>;
}
