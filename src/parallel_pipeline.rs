use crate::core_modules::aggregator::PartialSum;
use crate::core_modules::car::Car;
use crate::core_modules::partitioner::Partition;
use crate::core_modules::result_monitor::ResultMonitor;
use crate::core_modules::worker::{Worker, WorkerSettings};
use crate::pipeline::PipelineError;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, error};

/// One partition together with the records it owns.
pub struct WorkerTask {
    pub partition: Partition,
    pub cars: Vec<Car>,
}

/// A fixed pool of workers sharing one result collection.
pub struct WorkerPool {
    settings: WorkerSettings,
    monitor: Arc<ResultMonitor>,
}

impl WorkerPool {
    pub fn new(settings: WorkerSettings, monitor: Arc<ResultMonitor>) -> Self {
        Self { settings, monitor }
    }

    /// Launches one worker per task, waits for all of them, and returns their
    /// partial sums. Every worker is joined even if one of them fails.
    pub async fn run(self, tasks: Vec<WorkerTask>) -> Result<Vec<PartialSum>, PipelineError> {
        let mut worker_ids = Vec::with_capacity(tasks.len());
        let mut workers = Vec::with_capacity(tasks.len());

        // Spawn workers. Each runs on its own blocking thread since the per-record
        // cost never yields.
        for task in tasks {
            let worker = Worker::new(
                task.partition.worker_id,
                task.partition.range,
                task.cars,
                self.settings.clone(),
                Arc::clone(&self.monitor),
            );
            worker_ids.push(worker.id());
            workers.push(tokio::task::spawn_blocking(move || worker.run()));
        }
        drop(self.monitor);
        debug!(workers = workers.len(), "worker pool launched");

        let joined = join_all(workers).await;

        let mut partials = Vec::with_capacity(joined.len());
        let mut failure = None;
        for (worker_id, result) in worker_ids.into_iter().zip(joined) {
            match result {
                Ok(Ok(partial)) => partials.push(partial),
                Ok(Err(err)) => {
                    error!(worker = worker_id, error = %err, "worker failed");
                    if failure.is_none() {
                        failure = Some(PipelineError::Monitor(err));
                    }
                }
                Err(join_err) => {
                    error!(worker = worker_id, error = %join_err, "worker panicked");
                    if failure.is_none() {
                        failure = Some(PipelineError::WorkerPanicked {
                            worker_id,
                            message: join_err.to_string(),
                        });
                    }
                }
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(partials),
        }
    }
}
