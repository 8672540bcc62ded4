pub mod aggregator;
pub mod car;
pub mod fingerprint;
pub mod partitioner;
pub mod result_monitor;
pub mod scorer;
pub mod simulated_work;
pub mod utils;
pub mod worker;
