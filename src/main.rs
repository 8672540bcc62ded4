// Batch runner: loads a dataset, prints it, scores it with the fixed worker pool
// and writes both tables to a report file.
//
// Usage: car_pipeline [input.json] [report.txt]
// Overrides: CARS_WORKERS, CARS_THRESHOLD, CARS_ORDER (score|make), CARS_SPIN.

use anyhow::{Context, Result};
use car_pipeline::core_modules::utils::loader::load_from_path;
use car_pipeline::core_modules::utils::report::report;
use car_pipeline::pipeline::{PipelineConfig, ScoringPipeline};
use std::env;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_INPUT: &str = "data/cars.json";
const DEFAULT_REPORT: &str = "results.txt";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let input = args.get(1).map(String::as_str).unwrap_or(DEFAULT_INPUT);
    let output = args.get(2).map(String::as_str).unwrap_or(DEFAULT_REPORT);

    let config = PipelineConfig::default()
        .with_overrides(|key| env::var(key).ok())
        .context("invalid configuration override")?;

    let dataset = load_from_path(input, config.capacity)
        .with_context(|| format!("failed to load dataset from {}", input))?;

    print!("{}", report::render_initial_data(dataset.cars()));
    report::write_initial_data(output, dataset.cars())
        .with_context(|| format!("failed to write {}", output))?;

    let outcome = ScoringPipeline::new(config)
        .run(&dataset)
        .await
        .context("scoring run failed")?;

    print!("{}", report::total_line(outcome.total()));
    report::append_results(output, &outcome.results, outcome.total())
        .with_context(|| format!("failed to write {}", output))?;

    println!("Processing complete. Report saved to {}", output);
    Ok(())
}
