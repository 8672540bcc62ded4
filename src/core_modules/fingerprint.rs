// THEORY:
// A fingerprint is an opaque identity for a record: the same make, consumption
// and power always hash to the same text, on every run and on every worker.
// It carries no meaning beyond that.
//
// The hash input is fed in a fixed order (make, consumption text, power text).
// Numbers go through `consumption_text` / `power_text` so the textual form is
// pinned down in one place and reused by the report renderer.

use crate::core_modules::car::Car;
use sha2::{Digest, Sha256};

/// Fixed textual form of a consumption value: six decimal places.
pub fn consumption_text(consumption: f64) -> String {
    format!("{:.6}", consumption)
}

/// Fixed textual form of a power value.
pub fn power_text(power: u32) -> String {
    power.to_string()
}

/// Computes the lowercase hex SHA-256 fingerprint of the identifying fields.
pub fn fingerprint_fields(make: &str, consumption: f64, power: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(make.as_bytes());
    hasher.update(consumption_text(consumption).as_bytes());
    hasher.update(power_text(power).as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn fingerprint(car: &Car) -> String {
    fingerprint_fields(&car.make, car.consumption, car.power)
}
