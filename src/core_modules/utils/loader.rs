// THEORY:
// The loader turns a JSON document of the form `{"cars": [{"make", "consumption",
// "power"}, ...]}` into a bounded `Dataset`. Any problem is fatal to the run and is
// reported before a single worker starts, naming the record and field at fault.

use crate::core_modules::car::{Car, Dataset};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document has no top-level `cars` array")]
    MissingCars,
    #[error("record {index} is invalid: {reason}")]
    InvalidRecord { index: usize, reason: String },
    #[error("dataset holds at most {capacity} records, found {found}")]
    CapacityExceeded { capacity: usize, found: usize },
}

pub fn load_from_str(json: &str, capacity: usize) -> Result<Dataset, LoadError> {
    let document: Value = serde_json::from_str(json)?;
    let entries = document
        .get("cars")
        .and_then(Value::as_array)
        .ok_or(LoadError::MissingCars)?;

    if entries.len() > capacity {
        return Err(LoadError::CapacityExceeded {
            capacity,
            found: entries.len(),
        });
    }

    let mut dataset = Dataset::new(capacity);
    for (index, entry) in entries.iter().enumerate() {
        let car: Car = serde_json::from_value(entry.clone()).map_err(|e| LoadError::InvalidRecord {
            index,
            reason: e.to_string(),
        })?;
        dataset.push(car).map_err(|_| LoadError::CapacityExceeded {
            capacity,
            found: entries.len(),
        })?;
    }
    Ok(dataset)
}

pub fn load_from_path(path: impl AsRef<Path>, capacity: usize) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = load_from_str(&json, capacity)?;
    info!(path = %path.display(), records = dataset.len(), "dataset loaded");
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_records_in_order() {
        let json = r#"{"cars": [
            {"make": "Toyota", "consumption": 5.0, "power": 100},
            {"make": "Audi", "consumption": 4.0, "power": 60}
        ]}"#;
        let dataset = load_from_str(json, 16).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.cars()[0], Car::new("Toyota", 5.0, 100));
        assert_eq!(dataset.cars()[1], Car::new("Audi", 4.0, 60));
    }

    #[test]
    fn derived_fields_in_input_are_ignored() {
        let json = r#"{"cars": [{"make": "Fiat", "consumption": 5, "power": 70,
                                  "fingerprint": "abc", "score": 3.0}]}"#;
        let dataset = load_from_str(json, 16).unwrap();
        assert!(dataset.cars()[0].fingerprint.is_empty());
        assert_eq!(dataset.cars()[0].score, 0.0);
    }

    #[test]
    fn missing_field_names_record_and_field() {
        let json = r#"{"cars": [
            {"make": "Toyota", "consumption": 5.0, "power": 100},
            {"make": "Audi", "power": 60}
        ]}"#;
        match load_from_str(json, 16) {
            Err(LoadError::InvalidRecord { index, reason }) => {
                assert_eq!(index, 1);
                assert!(reason.contains("consumption"), "{}", reason);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn negative_power_is_invalid() {
        let json = r#"{"cars": [{"make": "X", "consumption": 5.0, "power": -3}]}"#;
        assert!(matches!(
            load_from_str(json, 16),
            Err(LoadError::InvalidRecord { index: 0, .. })
        ));
    }

    #[test]
    fn missing_cars_and_bad_json_are_errors() {
        assert!(matches!(load_from_str(r#"{"trucks": []}"#, 16), Err(LoadError::MissingCars)));
        assert!(matches!(load_from_str("{not json", 16), Err(LoadError::Json(_))));
    }

    #[test]
    fn too_many_records_is_rejected() {
        let cars: Vec<String> = (0..17)
            .map(|i| format!(r#"{{"make": "M{}", "consumption": 5.0, "power": 100}}"#, i))
            .collect();
        let json = format!(r#"{{"cars": [{}]}}"#, cars.join(","));
        assert!(matches!(
            load_from_str(&json, 16),
            Err(LoadError::CapacityExceeded { capacity: 16, found: 17 })
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"cars": [{{"make": "Volvo", "consumption": 8.0, "power": 180}}]}}"#).unwrap();
        let dataset = load_from_path(file.path(), 16).unwrap();
        assert_eq!(dataset.cars()[0].make, "Volvo");

        let missing = load_from_path(file.path().with_extension("missing"), 16);
        assert!(matches!(missing, Err(LoadError::Io { .. })));
    }
}
