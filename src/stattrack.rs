/// The `SimulationStats` struct is a simple collection of named counters accumulated over one
/// replay: how many references hit a resident page, how many faulted, and the total latency
/// charged to each class. Created at run start, mutated only by the simulator, read once at the
/// end.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct SimulationStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_latency: u64,
    pub miss_latency: u64,
}

impl SimulationStats {
    /// Create a new instance of the `SimulationStats` struct with all counters initialized to
    /// zero.
    pub fn new() -> Self {
        Self {
            hits: 0,
            misses: 0,
            hit_latency: 0,
            miss_latency: 0,
        }
    }

    /// Total references processed: hits plus misses. Skipped out-of-range references never
    /// count.
    pub fn processed(&self) -> u64 {
        self.hits + self.misses
    }

    /// Hit share of processed references as a percentage; zero when nothing was processed.
    pub fn hit_percentage(&self) -> f64 {
        match self.processed() {
            0 => 0.0,
            total => self.hits as f64 / total as f64 * 100.0,
        }
    }

    /// Miss share of processed references as a percentage; zero when nothing was processed.
    pub fn miss_percentage(&self) -> f64 {
        match self.processed() {
            0 => 0.0,
            total => self.misses as f64 / total as f64 * 100.0,
        }
    }
}

impl std::fmt::Display for SimulationStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "
Simulation Summary
---------------------------------
references processed:    {:08}
hits:                    {:08}
misses:                  {:08}
hit percentage:          {:.02}%
miss percentage:         {:.02}%
total hit latency:       {} time units
total miss latency:      {} time units
               ",
            self.processed(),
            self.hits,
            self.misses,
            self.hit_percentage(),
            self.miss_percentage(),
            self.hit_latency,
            self.miss_latency,
        )
    }
}
