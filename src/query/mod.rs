pub mod aggregation;
pub mod kind;

pub use aggregation::{
    AggregationQuery, BlobAggregation, DoubleAggregation, QueryState, PENDING_COUNT,
};
pub use kind::AggregationKind;
