use std::time::{SystemTime, UNIX_EPOCH};
use tsagg::{
    AggregationEngine, AggregationKind, DoubleAggregation, DoublePoint, Filter, FilteredRange,
    MemoryEngine, SeriesKey, TimeRange, Timespec, TsaggConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("tsagg - Aggregation Query Example");
    println!("=================================");

    let config = TsaggConfig::default();
    let engine = MemoryEngine::new(&config);

    // Example 1: Insert CPU metrics
    println!("\n1. Inserting CPU metrics...");
    let cpu_series = SeriesKey::from("server1.cpu.usage");
    let start_time = get_current_timestamp();

    for i in 0..300 {
        let timestamp = start_time + i * 1000;
        let cpu_usage = 20.0 + (i as f64 / 10.0).sin() * 15.0 + rand::random::<f64>() * 10.0;
        let point = DoublePoint::new(Timespec::from_millis(timestamp), cpu_usage.clamp(0.0, 100.0));
        engine.insert_double(cpu_series.clone(), point).await?;
    }
    println!("   ✓ Inserted 300 CPU usage points");

    // Example 2: Formulate pending queries
    println!("\n2. Formulating aggregation queries...");
    let whole = TimeRange::from_millis(start_time, start_time + 300 * 1000)?;
    let busy = FilteredRange::new(cpu_series.clone(), whole)
        .with_filter(Filter::DoubleOutsideRange { min: 0.0, max: 30.0 });

    let all_cpu = FilteredRange::new(cpu_series.clone(), whole);
    let queries = vec![
        DoubleAggregation::pending(all_cpu.clone(), AggregationKind::ArithmeticMean),
        DoubleAggregation::pending(all_cpu.clone(), AggregationKind::Max),
        DoubleAggregation::pending(all_cpu, AggregationKind::PopulationStdDev),
        DoubleAggregation::pending(busy, AggregationKind::Count),
    ];
    for query in &queries {
        println!("   {}", query);
    }

    // Example 3: Execute them
    println!("\n3. Executing...");
    for query in &queries {
        let completed = engine.aggregate_double(query).await?;
        println!("   ✓ {}", completed);
    }

    // Example 4: A range with no samples still completes
    println!("\n4. Aggregating an empty range...");
    let later = TimeRange::from_millis(start_time + 600 * 1000, start_time + 700 * 1000)?;
    let quiet = FilteredRange::new(cpu_series, later);
    let empty = engine
        .aggregate_double(&DoubleAggregation::pending(quiet, AggregationKind::Sum))
        .await?;
    println!(
        "   ✓ {} (completed: {}, samples: {})",
        empty,
        empty.is_completed(),
        empty.has_samples()
    );

    println!("\nExample completed successfully!");
    Ok(())
}

fn get_current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
