use crate::error::{TsaggError, TsaggResult};
use crate::point::{BlobPoint, DoublePoint, ResultPoint};
use crate::query::AggregationKind;
use crate::timespec::Timespec;

/// Reduces time-ordered double samples to `(count, result)`.
///
/// Selecting kinds (first, last, min, max, abs_min, abs_max) return the
/// selected sample itself; ties go to the earliest one. All other kinds
/// stamp their result with `range_begin`. No samples yields the no-data
/// placeholder with a count of zero.
///
/// NaN samples are counted but never selected by min, max, abs_min or
/// abs_max, and spread ignores them. When every sample is NaN those kinds
/// return the first sample (spread returns NaN). Sum, mean, variance and
/// standard deviation propagate NaN.
pub fn aggregate_doubles(
    samples: &[DoublePoint],
    kind: AggregationKind,
    range_begin: Timespec,
) -> (u64, DoublePoint) {
    let (first, last) = match (samples.first(), samples.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return (0, DoublePoint::no_data()),
    };
    let count = samples.len() as u64;
    let at_begin = |value: f64| DoublePoint::new(range_begin, value);

    let result = match kind {
        AggregationKind::First => first.clone(),
        AggregationKind::Last => last.clone(),
        AggregationKind::Min => select_by(samples, |candidate, best| candidate < best),
        AggregationKind::Max => select_by(samples, |candidate, best| candidate > best),
        AggregationKind::AbsMin => {
            select_by(samples, |candidate, best| candidate.abs() < best.abs())
        }
        AggregationKind::AbsMax => {
            select_by(samples, |candidate, best| candidate.abs() > best.abs())
        }
        AggregationKind::Spread => at_begin(spread(samples)),
        AggregationKind::Sum => at_begin(samples.iter().map(|p| p.value).sum()),
        AggregationKind::Count => at_begin(count as f64),
        AggregationKind::ArithmeticMean => at_begin(mean(samples)),
        AggregationKind::PopulationVariance => at_begin(variance(samples)),
        AggregationKind::PopulationStdDev => at_begin(variance(samples).sqrt()),
    };

    (count, result)
}

/// Reduces time-ordered blob samples. Only first, last and count apply; a
/// count result carries the decimal count as its content.
pub fn aggregate_blobs(
    samples: &[BlobPoint],
    kind: AggregationKind,
    range_begin: Timespec,
) -> TsaggResult<(u64, BlobPoint)> {
    if !kind.supports_blob() {
        return Err(TsaggError::UnsupportedAggregation {
            kind: kind.to_string(),
            column: BlobPoint::COLUMN,
        });
    }

    let (first, last) = match (samples.first(), samples.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Ok((0, BlobPoint::no_data())),
    };
    let count = samples.len() as u64;

    let result = match kind {
        AggregationKind::First => first.clone(),
        AggregationKind::Last => last.clone(),
        _ => BlobPoint::new(range_begin, count.to_string()),
    };

    Ok((count, result))
}

fn select_by(samples: &[DoublePoint], better: impl Fn(f64, f64) -> bool) -> DoublePoint {
    let mut numbers = samples.iter().filter(|p| !p.value.is_nan());
    let mut best = match numbers.next() {
        Some(point) => point,
        None => return samples[0].clone(),
    };
    for point in numbers {
        if better(point.value, best.value) {
            best = point;
        }
    }
    best.clone()
}

fn spread(samples: &[DoublePoint]) -> f64 {
    let numbers = samples.iter().map(|p| p.value).filter(|v| !v.is_nan());
    let bounds = numbers.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        Some((min, max)) => Some((min.min(v), max.max(v))),
        None => Some((v, v)),
    });
    match bounds {
        Some((min, max)) => max - min,
        None => f64::NAN,
    }
}

fn mean(samples: &[DoublePoint]) -> f64 {
    samples.iter().map(|p| p.value).sum::<f64>() / samples.len() as f64
}

fn variance(samples: &[DoublePoint]) -> f64 {
    let mean = mean(samples);
    samples.iter().map(|p| (p.value - mean).powi(2)).sum::<f64>() / samples.len() as f64
}
