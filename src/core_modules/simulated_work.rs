// THEORY:
// Each record carries a fixed processing cost before it is scored. The cost has no
// side effects; it only models latency. `Spin` burns a deterministic number of loop
// iterations (kept alive with `black_box` so the optimizer cannot drop it), `Sleep`
// is an explicit delay, and `Jitter` sleeps for a random duration so tests can
// shake up the interleaving of workers.

use rand::Rng;
use std::hint::black_box;
use std::time::Duration;

/// Iteration count used by the default spin cost.
pub const DEFAULT_SPIN_ITERATIONS: u64 = 666_666;

#[derive(Debug, Clone, PartialEq)]
pub enum SimulatedWork {
    None,
    Spin { iterations: u64 },
    Sleep(Duration),
    Jitter { max: Duration },
}

impl Default for SimulatedWork {
    fn default() -> Self {
        SimulatedWork::Spin {
            iterations: DEFAULT_SPIN_ITERATIONS,
        }
    }
}

impl SimulatedWork {
    /// Runs the cost on the calling thread. Never yields to an async runtime.
    pub fn perform(&self) {
        match self {
            SimulatedWork::None => {}
            SimulatedWork::Spin { iterations } => {
                let mut acc = 0u64;
                for i in 0..black_box(*iterations) {
                    acc = black_box(acc.wrapping_add(i));
                }
                black_box(acc);
            }
            SimulatedWork::Sleep(duration) => std::thread::sleep(*duration),
            SimulatedWork::Jitter { max } => {
                let micros = max.as_micros() as u64;
                if micros > 0 {
                    let pause = rand::thread_rng().gen_range(0..=micros);
                    std::thread::sleep(Duration::from_micros(pause));
                }
            }
        }
    }
}
