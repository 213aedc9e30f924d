use std::time::Duration;

/// Exponential retry delay for the initial resource fetch.
pub struct Backoff {
    max: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        let initial = initial.max(Duration::from_millis(1));
        Self {
            max: max.max(initial),
            current: initial,
        }
    }

    /// Delay to sleep before the next attempt; doubles after each call up to
    /// the cap.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(self.max);
        delay
    }
}
