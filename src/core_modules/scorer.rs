// THEORY:
// The scorer turns a record into a single performance number, power per unit of
// consumption, and decides whether that number clears the filter threshold.
//
// Division is guarded: a consumption that is zero, negative or not finite would
// produce an infinite or meaningless score and break the ordering of the result
// collection. Such records are rejected with a `ScoreError` and never reach it.

pub mod scorer {
    use crate::core_modules::car::Car;
    use thiserror::Error;

    pub type Score = f64;

    /// The default filter threshold.
    pub const DEFAULT_THRESHOLD: Score = 19.0;

    #[derive(Debug, Clone, PartialEq, Error)]
    pub enum ScoreError {
        #[error("consumption must be positive, got {0}")]
        NonPositiveConsumption(f64),
        #[error("score is not finite: {power} / {consumption}")]
        NonFinite { power: u32, consumption: f64 },
    }

    /// `power / consumption`, or an error if the quotient would be unusable.
    pub fn score(car: &Car) -> Result<Score, ScoreError> {
        if !car.consumption.is_finite() || car.consumption <= 0.0 {
            return Err(ScoreError::NonPositiveConsumption(car.consumption));
        }
        let value = car.power as f64 / car.consumption;
        if !value.is_finite() {
            return Err(ScoreError::NonFinite {
                power: car.power,
                consumption: car.consumption,
            });
        }
        Ok(value)
    }

    /// Strictly greater than; a score equal to the threshold is rejected.
    pub fn meets_filter(score: Score, threshold: Score) -> bool {
        score > threshold
    }
}
