// THEORY:
// The `pipeline` module is the top-level API of the crate. A caller builds a
// `PipelineConfig`, hands a loaded `Dataset` to `ScoringPipeline::run`, and gets
// back the ordered result collection together with the aggregate total.
//
// One run goes through four stages:
// 1. Partition the index range across the fixed worker pool.
// 2. Move each partition's records into its worker and launch the pool once.
// 3. Wait for every worker (the join barrier). Nothing is read before this point.
// 4. Reduce the per-worker partial sums and take the collection out of its lock.

use crate::core_modules::aggregator::{aggregate, Aggregate};
use crate::core_modules::car::{Car, Dataset};
use crate::core_modules::partitioner::{partition, PartitionError};
use crate::core_modules::result_monitor::{MonitorError, ResultMonitor};
use crate::core_modules::scorer::scorer::{Score, DEFAULT_THRESHOLD};
use crate::core_modules::worker::WorkerSettings;
use crate::parallel_pipeline::{WorkerPool, WorkerTask};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

// Re-export key data structures for the public API.
pub use crate::core_modules::result_monitor::OrderingPolicy;
pub use crate::core_modules::simulated_work::SimulatedWork;

pub const DEFAULT_CAPACITY: usize = 16;
pub const DEFAULT_WORKER_COUNT: usize = 6;

/// Configuration for the ScoringPipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Maximum number of records in the dataset and in the result collection.
    pub capacity: usize,
    /// Size of the worker pool.
    pub worker_count: usize,
    /// Records must score strictly above this to be collected.
    pub filter_threshold: Score,
    /// Sort key of the result collection.
    pub ordering: OrderingPolicy,
    /// Cost paid for every record before it is scored.
    pub simulated_work: SimulatedWork,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            worker_count: DEFAULT_WORKER_COUNT,
            filter_threshold: DEFAULT_THRESHOLD,
            ordering: OrderingPolicy::default(),
            simulated_work: SimulatedWork::default(),
        }
    }
}

/// Environment variables read by `PipelineConfig::with_overrides`.
pub const ENV_WORKERS: &str = "CARS_WORKERS";
pub const ENV_THRESHOLD: &str = "CARS_THRESHOLD";
pub const ENV_ORDER: &str = "CARS_ORDER";
pub const ENV_SPIN: &str = "CARS_SPIN";

#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid value '{value}' for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

impl PipelineConfig {
    /// Applies overrides from a key lookup, usually `std::env::var`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError>
        where
            T::Err: std::fmt::Display,
        {
            value.trim().parse().map_err(|e: T::Err| ConfigError {
                key,
                reason: e.to_string(),
                value,
            })
        }

        if let Some(value) = lookup(ENV_WORKERS) {
            self.worker_count = parse(ENV_WORKERS, value)?;
        }
        if let Some(value) = lookup(ENV_THRESHOLD) {
            self.filter_threshold = parse(ENV_THRESHOLD, value)?;
        }
        if let Some(value) = lookup(ENV_ORDER) {
            self.ordering = parse(ENV_ORDER, value)?;
        }
        if let Some(value) = lookup(ENV_SPIN) {
            self.simulated_work = SimulatedWork::Spin {
                iterations: parse(ENV_SPIN, value)?,
            };
        }
        Ok(self)
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Partition(#[from] PartitionError),
    #[error(transparent)]
    Monitor(#[from] MonitorError),
    #[error("worker {worker_id} panicked: {message}")]
    WorkerPanicked { worker_id: usize, message: String },
    #[error("dataset has {len} records but the pipeline capacity is {capacity}")]
    DatasetTooLarge { len: usize, capacity: usize },
}

/// Everything a run produces, available only after the join barrier.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    /// Accepted records in collection order.
    pub results: Vec<Car>,
    pub aggregate: Aggregate,
}

impl PipelineOutcome {
    pub fn total(&self) -> f64 {
        self.aggregate.total
    }

    pub fn count(&self) -> usize {
        self.results.len()
    }
}

/// The main, top-level struct for the scoring engine.
pub struct ScoringPipeline {
    config: PipelineConfig,
}

impl ScoringPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn run(&self, dataset: &Dataset) -> Result<PipelineOutcome, PipelineError> {
        let config = &self.config;
        if dataset.len() > config.capacity {
            return Err(PipelineError::DatasetTooLarge {
                len: dataset.len(),
                capacity: config.capacity,
            });
        }

        // Stage 1: Partitioning
        let partitions = partition(dataset.len(), config.worker_count)?;

        let cpus = num_cpus::get();
        info!(
            records = dataset.len(),
            workers = config.worker_count,
            cpus,
            threshold = config.filter_threshold,
            ordering = config.ordering.name(),
            "starting scoring run"
        );
        if config.worker_count > cpus {
            warn!(workers = config.worker_count, cpus, "worker pool oversubscribes available cpus");
        }

        // Stage 2: Launch
        let tasks: Vec<WorkerTask> = partitions
            .into_iter()
            .map(|partition| WorkerTask {
                cars: dataset.cars()[partition.range.clone()].to_vec(),
                partition,
            })
            .collect();

        let monitor = Arc::new(ResultMonitor::new(config.capacity, config.ordering));
        let settings = WorkerSettings {
            threshold: config.filter_threshold,
            simulated_work: config.simulated_work.clone(),
        };

        // Stage 3: Join barrier
        let partials = WorkerPool::new(settings, Arc::clone(&monitor)).run(tasks).await?;

        // Stage 4: Reduction
        let aggregate = aggregate(partials);
        let results = match Arc::try_unwrap(monitor) {
            Ok(monitor) => monitor.into_cars()?,
            Err(shared) => shared.snapshot()?,
        };

        info!(accepted = results.len(), total = aggregate.total, "scoring run complete");
        Ok(PipelineOutcome { results, aggregate })
    }
}
