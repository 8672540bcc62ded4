// THEORY:
// A `Worker` owns one partition of the dataset: an owned copy of its records and
// the index range they came from. It walks that partition in ascending index order
// and, for every record, pays the simulated cost, fingerprints it, scores it and,
// if the score clears the threshold, moves it into the shared `ResultMonitor`.
//
// The only shared state a worker touches is the monitor. Its partial sum is a local
// variable that is returned when the partition is done.

use crate::core_modules::aggregator::PartialSum;
use crate::core_modules::car::Car;
use crate::core_modules::fingerprint::fingerprint;
use crate::core_modules::result_monitor::{MonitorError, ResultMonitor};
use crate::core_modules::scorer::scorer::{self, Score, ScoreError};
use crate::core_modules::simulated_work::SimulatedWork;
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// What happened to a single record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// Inserted into the result collection.
    Accepted { contribution: f64 },
    /// Scored, but not above the threshold.
    Filtered,
    /// The score could not be computed.
    Rejected(ScoreError),
}

/// Settings every worker of one run shares.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerSettings {
    pub threshold: Score,
    pub simulated_work: SimulatedWork,
}

pub struct Worker {
    id: usize,
    range: Range<usize>,
    cars: Vec<Car>,
    settings: WorkerSettings,
    monitor: Arc<ResultMonitor>,
}

impl Worker {
    /// `cars` must be the records of `range`, in index order.
    pub fn new(
        id: usize,
        range: Range<usize>,
        cars: Vec<Car>,
        settings: WorkerSettings,
        monitor: Arc<ResultMonitor>,
    ) -> Self {
        debug_assert_eq!(range.len(), cars.len());
        Self {
            id,
            range,
            cars,
            settings,
            monitor,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Processes the whole partition and returns this worker's contribution.
    pub fn run(self) -> Result<PartialSum, MonitorError> {
        debug!(worker = self.id, start = self.range.start, end = self.range.end, "worker started");
        let mut partial = PartialSum::new(self.id);

        for (index, car) in self.range.clone().zip(self.cars) {
            match process_car(car, &self.settings, &self.monitor)? {
                RecordOutcome::Accepted { contribution } => {
                    trace!(worker = self.id, index, "accepted");
                    partial.accepted += 1;
                    partial.total += contribution;
                }
                RecordOutcome::Filtered => {
                    trace!(worker = self.id, index, "filtered");
                    partial.filtered += 1;
                }
                RecordOutcome::Rejected(err) => {
                    warn!(worker = self.id, index, error = %err, "record rejected");
                    partial.rejected += 1;
                }
            }
        }

        debug!(
            worker = self.id,
            accepted = partial.accepted,
            total = partial.total,
            "worker finished"
        );
        Ok(partial)
    }
}

/// Runs the per-record steps on one owned record.
pub fn process_car(
    mut car: Car,
    settings: &WorkerSettings,
    monitor: &ResultMonitor,
) -> Result<RecordOutcome, MonitorError> {
    settings.simulated_work.perform();

    car.fingerprint = fingerprint(&car);
    car.score = match scorer::score(&car) {
        Ok(score) => score,
        Err(err) => return Ok(RecordOutcome::Rejected(err)),
    };

    if !scorer::meets_filter(car.score, settings.threshold) {
        return Ok(RecordOutcome::Filtered);
    }

    let contribution = car.contribution();
    monitor.add_sorted(car)?;
    Ok(RecordOutcome::Accepted { contribution })
}
