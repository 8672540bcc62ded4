// THEORY:
// Every worker keeps its own running sum of `power + consumption` over the records
// it accepted and hands it back when its partition is finished. Nothing is staged
// in a shared slot; the totals only meet here, after the join barrier.
//
// Floating point addition is not associative, so the partials are summed in
// worker-id order. That makes the total bit-identical no matter which worker
// finished first.

/// One worker's finished contribution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialSum {
    pub worker_id: usize,
    /// Records inserted into the result collection.
    pub accepted: usize,
    /// Records scored successfully but at or below the threshold.
    pub filtered: usize,
    /// Records whose score could not be computed.
    pub rejected: usize,
    /// Sum of `power + consumption` over the accepted records.
    pub total: f64,
}

impl PartialSum {
    pub fn new(worker_id: usize) -> Self {
        Self {
            worker_id,
            ..Self::default()
        }
    }

    pub fn processed(&self) -> usize {
        self.accepted + self.filtered + self.rejected
    }
}

/// The reduced result of all workers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    pub total: f64,
    pub accepted: usize,
    pub filtered: usize,
    pub rejected: usize,
    /// Per-worker partials, sorted by worker id.
    pub partials: Vec<PartialSum>,
}

pub fn aggregate(partials: impl IntoIterator<Item = PartialSum>) -> Aggregate {
    let mut partials: Vec<PartialSum> = partials.into_iter().collect();
    partials.sort_by_key(|p| p.worker_id);

    let mut result = Aggregate::default();
    for p in &partials {
        result.total += p.total;
        result.accepted += p.accepted;
        result.filtered += p.filtered;
        result.rejected += p.rejected;
    }
    result.partials = partials;
    result
}
