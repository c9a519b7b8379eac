//! Wall-clock cadence for the lookahead tick.

use std::time::{Duration, Instant};

/// A recurring timer polled by its owner.
///
/// Fires on the first poll, then whenever `interval` has elapsed since
/// it was due. A late poll fires once; missed intervals are not queued.
#[derive(Clone, Debug)]
pub struct TickTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl TickTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Returns true if the tick should run now.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now < due => false,
            Some(due) if now.duration_since(due) < self.interval => {
                self.next_due = Some(due + self.interval);
                true
            }
            _ => {
                self.next_due = Some(now + self.interval);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn fires_immediately_then_on_cadence() {
        let t0 = Instant::now();
        let mut timer = TickTimer::new(25 * MS);
        assert!(timer.poll(t0));
        assert!(!timer.poll(t0 + 10 * MS));
        assert!(timer.poll(t0 + 25 * MS));
        assert!(!timer.poll(t0 + 40 * MS));
        assert!(timer.poll(t0 + 52 * MS));
    }

    #[test]
    fn stall_fires_once() {
        let t0 = Instant::now();
        let mut timer = TickTimer::new(25 * MS);
        timer.poll(t0);
        assert!(timer.poll(t0 + 1000 * MS));
        assert!(!timer.poll(t0 + 1001 * MS));
        assert!(timer.poll(t0 + 1025 * MS));
    }
}
