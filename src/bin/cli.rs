use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;
use tsagg::{
    AggregationEngine, AggregationKind, DoubleAggregation, DoublePoint, FilteredRange,
    MemoryEngine, SeriesKey, TimeRange, Timespec, TsaggConfig, TsaggResult,
};

const USAGE: &str = "usage: tsagg-cli <points.json> <series> <kind> <begin_ms> <end_ms>";

#[derive(Debug, Deserialize)]
struct SampleRecord {
    series: String,
    timestamp_ms: i64,
    value: f64,
}

#[derive(Debug, Serialize)]
struct AggregationReport {
    series: String,
    kind: AggregationKind,
    count: u64,
    timestamp: Option<String>,
    value: Option<f64>,
}

#[derive(Debug, PartialEq)]
struct CliArgs {
    points: PathBuf,
    selection: FilteredRange,
    kind: AggregationKind,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = TsaggConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&args)?;

    let engine = MemoryEngine::new(&config);
    let loaded = load_samples(&engine, &args.points).await?;
    info!("Loaded {} samples from {}", loaded, args.points.display());

    let pending = DoubleAggregation::pending(args.selection, args.kind);
    let completed = engine.aggregate_double(&pending).await?;
    info!("{}", completed);

    let report = build_report(&completed);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn parse_args(args: &[String]) -> Result<CliArgs, Box<dyn std::error::Error>> {
    let [points, series, kind, begin, end] = args else {
        return Err(USAGE.into());
    };

    let kind: AggregationKind = kind.parse()?;
    let range = TimeRange::from_millis(begin.parse()?, end.parse()?)?;

    Ok(CliArgs {
        points: PathBuf::from(points),
        selection: FilteredRange::new(series.as_str(), range),
        kind,
    })
}

async fn load_samples(engine: &MemoryEngine, path: &Path) -> TsaggResult<usize> {
    let raw = tokio::fs::read_to_string(path).await?;
    let records: Vec<SampleRecord> = serde_json::from_str(&raw)?;
    let loaded = records.len();

    for record in records {
        let point = DoublePoint::new(Timespec::from_millis(record.timestamp_ms), record.value);
        engine.insert_double(SeriesKey::from(record.series), point).await?;
    }

    Ok(loaded)
}

fn build_report(completed: &DoubleAggregation) -> AggregationReport {
    let result = completed.sampled_result();
    AggregationReport {
        series: completed.filtered_range().series.to_string(),
        kind: completed.kind(),
        count: completed.count().unwrap_or(0),
        timestamp: result.map(|point| point.timestamp.to_string()),
        value: result.map(|point| point.value),
    }
}
