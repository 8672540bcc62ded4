pub mod report {
    use crate::core_modules::car::Car;
    use crate::core_modules::fingerprint::{consumption_text, power_text};
    use std::fs::OpenOptions;
    use std::io::Write;
    use std::path::Path;
    use thiserror::Error;

    const INITIAL_WIDTH: usize = 70;
    const RESULTS_WIDTH: usize = 160;
    const COLUMN: usize = 20;
    const FINGERPRINT_COLUMN: usize = 64;

    #[derive(Debug, Error)]
    pub enum ReportError {
        #[error("failed to write report: {0}")]
        Io(#[from] std::io::Error),
    }

    fn dashes(width: usize) -> String {
        format!("{}\n", "-".repeat(width))
    }

    /// Table of every loaded record in load order.
    pub fn render_initial_data(cars: &[Car]) -> String {
        let mut out = String::from("Initial data\n");
        out.push_str(&dashes(INITIAL_WIDTH));
        out.push_str(&format!(
            "| {:<w$} | {:<w$} | {:<w$} |\n",
            "Make",
            "Consumption",
            "Power",
            w = COLUMN
        ));
        out.push_str(&dashes(INITIAL_WIDTH));
        for car in cars {
            out.push_str(&format!(
                "| {:<w$} | {:<w$} | {:<w$} |\n",
                car.make,
                consumption_text(car.consumption),
                power_text(car.power),
                w = COLUMN
            ));
        }
        out.push_str(&dashes(INITIAL_WIDTH));
        out
    }

    /// Table of accepted records in collection order, followed by the aggregate total.
    pub fn render_results(cars: &[Car], total: f64) -> String {
        let mut out = String::from("Results\n");
        out.push_str(&dashes(RESULTS_WIDTH));
        out.push_str(&format!(
            "| {:<w$} | {:<w$} | {:<w$} | {:<w$} | {:<f$} |\n",
            "Make",
            "Consumption",
            "Power",
            "Score",
            "Fingerprint",
            w = COLUMN,
            f = FINGERPRINT_COLUMN
        ));
        out.push_str(&dashes(RESULTS_WIDTH));
        for car in cars {
            out.push_str(&format!(
                "| {:<w$} | {:<w$} | {:<w$} | {:<w$.6} | {:<f$} |\n",
                car.make,
                consumption_text(car.consumption),
                power_text(car.power),
                car.score,
                car.fingerprint,
                w = COLUMN,
                f = FINGERPRINT_COLUMN
            ));
        }
        out.push_str(&dashes(RESULTS_WIDTH));
        out.push_str(&total_line(total));
        out
    }

    pub fn total_line(total: f64) -> String {
        format!("Total (power + consumption of accepted records): {:.6}\n", total)
    }

    /// Truncates `path` and writes the initial data table.
    pub fn write_initial_data(path: impl AsRef<Path>, cars: &[Car]) -> Result<(), ReportError> {
        let mut file = std::fs::File::create(path)?;
        file.write_all(render_initial_data(cars).as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    }

    /// Appends the results table to `path`.
    pub fn append_results(path: impl AsRef<Path>, cars: &[Car], total: f64) -> Result<(), ReportError> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(render_results(cars, total).as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::report::*;
    use crate::core_modules::car::Car;

    fn processed(make: &str, consumption: f64, power: u32, score: f64) -> Car {
        let mut car = Car::new(make, consumption, power);
        car.score = score;
        car.fingerprint = "f".repeat(64);
        car
    }

    #[test]
    fn initial_table_lists_every_record() {
        let cars = vec![Car::new("Toyota", 5.0, 100), Car::new("Audi", 4.0, 60)];
        let table = render_initial_data(&cars);
        let toyota = table.find("Toyota").unwrap();
        let audi = table.find("Audi").unwrap();
        assert!(toyota < audi);
        assert!(table.contains("5.000000"));
        assert!(table.lines().any(|l| l.starts_with("| Make")));
    }

    #[test]
    fn results_table_includes_score_fingerprint_and_total() {
        let cars = vec![processed("Toyota", 5.0, 100, 20.0)];
        let table = render_results(&cars, 105.0);
        assert!(table.contains("20.000000"));
        assert!(table.contains(&"f".repeat(64)));
        assert!(table.ends_with(&total_line(105.0)));
    }

    #[test]
    fn report_file_holds_both_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        std::fs::write(&path, "stale contents").unwrap();

        write_initial_data(&path, &[Car::new("Toyota", 5.0, 100)]).unwrap();
        append_results(&path, &[processed("Toyota", 5.0, 100, 20.0)], 105.0).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("stale"));
        let initial = text.find("Initial data").unwrap();
        let results = text.find("Results").unwrap();
        assert!(initial < results);
    }
}
