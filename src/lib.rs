// THEORY:
// This file is the main entry point for the `car_pipeline` library crate.
// The public API is the `ScoringPipeline` and its configuration (`pipeline`),
// backed by the fixed worker pool in `parallel_pipeline`. The per-record
// building blocks (fingerprinting, scoring, partitioning, the shared result
// collection) and the I/O helpers live in `core_modules`.

pub mod core_modules;
pub mod parallel_pipeline;
pub mod pipeline;
