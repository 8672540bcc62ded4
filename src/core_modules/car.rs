// THEORY:
// The `Car` is the single unit of data that flows through the scoring pipeline.
// It is a "dumb" data container: three identifying fields that are fixed at load
// time, plus two derived fields (`fingerprint`, `score`) that a worker fills in
// exactly once while processing the record.
//
// The `Dataset` is the bounded container the loader fills. Its capacity is fixed
// when it is created and can never be exceeded; an overflow is reported as an
// error instead of silently dropping or overwriting a record.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One vehicle record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    /// The manufacturer name.
    pub make: String,
    /// Fuel consumption. Expected to be positive.
    pub consumption: f64,
    /// Engine power.
    pub power: u32,
    /// Content hash of the identifying fields. Empty until processed.
    #[serde(default, skip_deserializing)]
    pub fingerprint: String,
    /// `power / consumption`. Zero until processed.
    #[serde(default, skip_deserializing)]
    pub score: f64,
}

impl Car {
    pub fn new(make: impl Into<String>, consumption: f64, power: u32) -> Self {
        Self {
            make: make.into(),
            consumption,
            power,
            fingerprint: String::new(),
            score: 0.0,
        }
    }

    /// The value this record contributes to the aggregate total once accepted.
    pub fn contribution(&self) -> f64 {
        self.power as f64 + self.consumption
    }

    /// Returns true once a worker has written the derived fields.
    pub fn is_processed(&self) -> bool {
        !self.fingerprint.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("dataset is full (capacity {capacity})")]
pub struct DatasetFull {
    pub capacity: usize,
}

/// A capacity-limited, load-ordered collection of records.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    capacity: usize,
    cars: Vec<Car>,
}

impl Dataset {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            cars: Vec::with_capacity(capacity),
        }
    }

    /// Builds a dataset from an iterator, failing on the first record past capacity.
    pub fn from_cars(
        capacity: usize,
        cars: impl IntoIterator<Item = Car>,
    ) -> Result<Self, DatasetFull> {
        let mut dataset = Self::new(capacity);
        for car in cars {
            dataset.push(car)?;
        }
        Ok(dataset)
    }

    pub fn push(&mut self, car: Car) -> Result<(), DatasetFull> {
        if self.cars.len() >= self.capacity {
            return Err(DatasetFull {
                capacity: self.capacity,
            });
        }
        self.cars.push(car);
        Ok(())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn into_cars(self) -> Vec<Car> {
        self.cars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_car_is_unprocessed() {
        let car = Car::new("Toyota", 5.0, 100);
        assert!(car.fingerprint.is_empty());
        assert_eq!(car.score, 0.0);
        assert!(!car.is_processed());
        assert_eq!(car.contribution(), 105.0);
    }

    #[test]
    fn dataset_rejects_overflow() {
        let mut dataset = Dataset::new(2);
        dataset.push(Car::new("A", 1.0, 1)).unwrap();
        dataset.push(Car::new("B", 1.0, 1)).unwrap();

        let err = dataset.push(Car::new("C", 1.0, 1)).unwrap_err();
        assert_eq!(err, DatasetFull { capacity: 2 });
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.cars()[1].make, "B");
    }

    #[test]
    fn dataset_keeps_load_order() {
        let dataset = Dataset::from_cars(
            16,
            ["Opel", "Audi", "Volvo"].map(|make| Car::new(make, 6.0, 90)),
        )
        .unwrap();
        let makes: Vec<&str> = dataset.cars().iter().map(|c| c.make.as_str()).collect();
        assert_eq!(makes, ["Opel", "Audi", "Volvo"]);
    }
}
