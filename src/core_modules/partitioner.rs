// THEORY:
// The partitioner splits the index range `[0, total)` into one contiguous range per
// worker. Every range has `total / workers` elements except the last one, which also
// takes the whole remainder. Remainders are deliberately not spread out.
//
// When there are fewer records than workers the leading ranges are empty. That is a
// valid outcome; those workers simply have nothing to do.

use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartitionError {
    #[error("cannot partition work across zero workers")]
    NoWorkers,
}

/// A contiguous range of record indices owned by one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub worker_id: usize,
    pub range: Range<usize>,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

pub fn partition(total: usize, workers: usize) -> Result<Vec<Partition>, PartitionError> {
    if workers == 0 {
        return Err(PartitionError::NoWorkers);
    }
    let chunk_size = total / workers;
    let partitions = (0..workers)
        .map(|worker_id| {
            let start = worker_id * chunk_size;
            let end = if worker_id == workers - 1 {
                total
            } else {
                start + chunk_size
            };
            Partition {
                worker_id,
                range: start..end,
            }
        })
        .collect();
    Ok(partitions)
}
