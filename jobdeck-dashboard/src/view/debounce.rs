//! Debounced values
//!
//! Rapid edits are buffered and only become visible after the input has been
//! quiet for a fixed delay. Time is passed in by the caller so the event loop
//! decides when to poll and tests stay deterministic.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    settled: T,
    pending: Option<(T, Instant)>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            delay,
            settled: initial,
            pending: None,
        }
    }

    /// Record a new value; each call restarts the quiet period
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Commit the pending value if the quiet period has elapsed
    ///
    /// Returns `true` when the settled value changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let due = self.deadline().is_some_and(|deadline| deadline <= now);
        due && self.flush()
    }

    /// Commit the pending value immediately
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some((value, _)) if value != self.settled => {
                self.settled = value;
                true
            }
            _ => false,
        }
    }

    /// When the pending value will settle, if one is waiting
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// The value downstream consumers should use
    pub fn settled(&self) -> &T {
        &self.settled
    }

    /// The most recent input, settled or not
    pub fn latest(&self) -> &T {
        self.pending
            .as_ref()
            .map(|(value, _)| value)
            .unwrap_or(&self.settled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn test_value_settles_after_quiet_period() {
        let start = Instant::now();
        let mut search = Debouncer::new(String::new(), DELAY);

        search.push("re".to_string(), start);
        assert_eq!(search.latest(), "re");
        assert_eq!(search.settled(), "");

        assert!(!search.poll(start + Duration::from_millis(299)));
        assert!(search.poll(start + DELAY));
        assert_eq!(search.settled(), "re");
        assert!(search.deadline().is_none());
    }

    #[test]
    fn test_each_keystroke_restarts_the_timer() {
        let start = Instant::now();
        let mut search = Debouncer::new(String::new(), DELAY);

        search.push("r".to_string(), start);
        search.push("re".to_string(), start + Duration::from_millis(200));
        search.push("res".to_string(), start + Duration::from_millis(400));

        assert!(!search.poll(start + Duration::from_millis(600)));
        assert_eq!(search.deadline(), Some(start + Duration::from_millis(700)));
        assert!(search.poll(start + Duration::from_millis(700)));
        assert_eq!(search.settled(), "res");
    }

    #[test]
    fn test_settling_to_same_value_is_not_a_change() {
        let start = Instant::now();
        let mut search = Debouncer::new("img".to_string(), DELAY);

        search.push("im".to_string(), start);
        search.push("img".to_string(), start + Duration::from_millis(10));

        assert!(!search.poll(start + Duration::from_secs(1)));
        assert!(search.deadline().is_none());
    }
}
