// THEORY:
// The `ResultMonitor` is the only piece of state the workers share. It owns a
// bounded, always-sorted list of accepted records behind a mutex. Its one write
// operation, `add_sorted`, takes the lock, checks capacity, inserts the record at
// its sorted position and releases the lock, so insertions never interleave and
// the list is in order after every single insert, not only at the end.
//
// Ordering is an explicit policy. `Score` (ascending performance score) is the
// default; `Make` (lexicographic by manufacturer) is the alternative. Both break
// ties on the remaining fields, which makes the final order a total order that
// does not depend on which worker got the lock first.

use crate::core_modules::car::Car;
use std::cmp::Ordering;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    #[error("result collection is full (capacity {capacity})")]
    CapacityExceeded { capacity: usize },
    #[error("result collection lock was poisoned by a panicking worker")]
    Poisoned,
}

/// The sort key of the result collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderingPolicy {
    /// Ascending by performance score.
    #[default]
    Score,
    /// Lexicographic by make.
    Make,
}

impl OrderingPolicy {
    pub fn compare(&self, a: &Car, b: &Car) -> Ordering {
        let by_score = || a.score.total_cmp(&b.score);
        let by_make = || a.make.cmp(&b.make);
        let rest = || {
            a.consumption
                .total_cmp(&b.consumption)
                .then_with(|| a.power.cmp(&b.power))
                .then_with(|| a.fingerprint.cmp(&b.fingerprint))
        };
        match self {
            OrderingPolicy::Score => by_score().then_with(by_make).then_with(rest),
            OrderingPolicy::Make => by_make().then_with(by_score).then_with(rest),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OrderingPolicy::Score => "score",
            OrderingPolicy::Make => "make",
        }
    }
}

impl std::str::FromStr for OrderingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "score" => Ok(OrderingPolicy::Score),
            "make" => Ok(OrderingPolicy::Make),
            other => Err(format!("unknown ordering policy '{}'", other)),
        }
    }
}

/// A bounded, mutually exclusive, order-maintained collection of accepted records.
pub struct ResultMonitor {
    /// Accepted records, sorted by `ordering` at every observation point.
    cars: Mutex<Vec<Car>>,
    capacity: usize,
    ordering: OrderingPolicy,
}

impl ResultMonitor {
    pub fn new(capacity: usize, ordering: OrderingPolicy) -> Self {
        Self {
            cars: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
            ordering,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Car>>, MonitorError> {
        self.cars.lock().map_err(|_| MonitorError::Poisoned)
    }

    /// Inserts `car` at its sorted position and returns that position.
    /// Records equal under the policy keep their arrival order.
    pub fn add_sorted(&self, car: Car) -> Result<usize, MonitorError> {
        let mut cars = self.lock()?;
        if cars.len() >= self.capacity {
            return Err(MonitorError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        let position =
            cars.partition_point(|existing| self.ordering.compare(existing, &car) != Ordering::Greater);
        cars.insert(position, car);
        Ok(position)
    }

    pub fn count(&self) -> Result<usize, MonitorError> {
        Ok(self.lock()?.len())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ordering(&self) -> OrderingPolicy {
        self.ordering
    }

    /// A copy of the valid entries, in collection order.
    pub fn snapshot(&self) -> Result<Vec<Car>, MonitorError> {
        Ok(self.lock()?.clone())
    }

    /// Consumes the monitor once every worker has finished with it.
    pub fn into_cars(self) -> Result<Vec<Car>, MonitorError> {
        self.cars.into_inner().map_err(|_| MonitorError::Poisoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn scored(make: &str, score: f64) -> Car {
        let mut car = Car::new(make, 5.0, 100);
        car.score = score;
        car
    }

    fn is_sorted(cars: &[Car], ordering: OrderingPolicy) -> bool {
        cars.windows(2)
            .all(|w| ordering.compare(&w[0], &w[1]) != Ordering::Greater)
    }

    #[test]
    fn keeps_ascending_score_after_every_insert() {
        let monitor = ResultMonitor::new(16, OrderingPolicy::Score);
        for (i, score) in [30.0, 20.5, 41.0, 19.5, 25.0].into_iter().enumerate() {
            monitor.add_sorted(scored(&format!("car{}", i), score)).unwrap();
            assert!(is_sorted(&monitor.snapshot().unwrap(), OrderingPolicy::Score));
        }
        let scores: Vec<f64> = monitor.snapshot().unwrap().iter().map(|c| c.score).collect();
        assert_eq!(scores, [19.5, 20.5, 25.0, 30.0, 41.0]);
    }

    #[test]
    fn make_policy_sorts_lexicographically() {
        let monitor = ResultMonitor::new(16, OrderingPolicy::Make);
        for make in ["Volvo", "Audi", "Mazda", "BMW"] {
            monitor.add_sorted(scored(make, 20.0)).unwrap();
        }
        let makes: Vec<String> = monitor.into_cars().unwrap().into_iter().map(|c| c.make).collect();
        assert_eq!(makes, ["Audi", "BMW", "Mazda", "Volvo"]);
    }

    #[test]
    fn returns_insert_position() {
        let monitor = ResultMonitor::new(4, OrderingPolicy::Score);
        assert_eq!(monitor.add_sorted(scored("a", 30.0)), Ok(0));
        assert_eq!(monitor.add_sorted(scored("b", 20.0)), Ok(0));
        assert_eq!(monitor.add_sorted(scored("c", 40.0)), Ok(2));
        assert_eq!(monitor.add_sorted(scored("d", 25.0)), Ok(1));
    }

    #[test]
    fn full_collection_rejects_insert() {
        let monitor = ResultMonitor::new(2, OrderingPolicy::Score);
        monitor.add_sorted(scored("a", 20.0)).unwrap();
        monitor.add_sorted(scored("b", 21.0)).unwrap();
        assert_eq!(
            monitor.add_sorted(scored("c", 22.0)),
            Err(MonitorError::CapacityExceeded { capacity: 2 })
        );
        assert_eq!(monitor.count(), Ok(2));
    }

    #[test]
    fn ties_are_broken_by_remaining_fields() {
        let ordering = OrderingPolicy::Score;
        let a = scored("Audi", 20.0);
        let b = scored("BMW", 20.0);
        assert_eq!(ordering.compare(&a, &b), Ordering::Less);
        assert_eq!(ordering.compare(&a, &a.clone()), Ordering::Equal);
    }

    #[test]
    fn policy_parses_from_text() {
        assert_eq!("score".parse::<OrderingPolicy>(), Ok(OrderingPolicy::Score));
        assert_eq!(" Make ".parse::<OrderingPolicy>(), Ok(OrderingPolicy::Make));
        assert!("power".parse::<OrderingPolicy>().is_err());
        assert_eq!(OrderingPolicy::default(), OrderingPolicy::Score);
    }

    #[test]
    fn concurrent_inserts_lose_nothing() {
        let monitor = Arc::new(ResultMonitor::new(64, OrderingPolicy::Score));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let monitor = Arc::clone(&monitor);
                std::thread::spawn(move || {
                    for i in 0..8 {
                        let score = 20.0 + ((t * 8 + i) * 37 % 64) as f64;
                        monitor.add_sorted(scored(&format!("t{}-{}", t, i), score)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let cars = Arc::try_unwrap(monitor).ok().unwrap().into_cars().unwrap();
        assert_eq!(cars.len(), 64);
        assert!(is_sorted(&cars, OrderingPolicy::Score));
        let mut makes: Vec<&str> = cars.iter().map(|c| c.make.as_str()).collect();
        makes.sort();
        makes.dedup();
        assert_eq!(makes.len(), 64);
    }
}
