/// Counters for one dispatch run.
///
/// Owned by the [`Dispatcher`](crate::Dispatcher) rather than living in
/// module-level state, so concurrent or repeated runs stay isolated and the
/// sampling logic is testable on its own.
#[derive(Debug, Clone)]
pub struct DispatchSession {
    attempted: u64,
    succeeded: u64,
    sequence: u64,
    sample_interval: u64,
}

impl DispatchSession {
    pub fn new(sample_interval: u64) -> Self {
        Self {
            attempted: 0,
            succeeded: 0,
            sequence: 0,
            sample_interval: sample_interval.max(1),
        }
    }

    /// Allocate the next send sequence number (1-based). Only non-empty
    /// recipients consume a sequence number.
    pub fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }

    /// Record one send attempt. Returns `true` when this attempt was a
    /// success that crossed a sampling threshold — i.e. exactly once per
    /// `sample_interval`-th successful send, never on failures.
    pub fn record(&mut self, success: bool) -> bool {
        self.attempted += 1;
        if success {
            self.succeeded += 1;
            self.succeeded % self.sample_interval == 0
        } else {
            false
        }
    }

    pub fn attempted(&self) -> u64 {
        self.attempted
    }

    pub fn succeeded(&self) -> u64 {
        self.succeeded
    }
}
