//! Pause-invariant timing
//!
//! Presentation delays keep elapsing while gameplay time is frozen, so the
//! scheduler keeps its own clock fed with unscaled frame deltas.

use std::time::Duration;

/// Real time accumulated from ticks
#[derive(Debug, Clone, Default)]
pub struct DraftClock {
    /// Total elapsed time in seconds
    elapsed: f64,
}

impl DraftClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by an unscaled delta
    pub fn advance(&mut self, delta: Duration) {
        self.elapsed += delta.as_secs_f64();
    }

    /// A deadline `seconds` from now
    pub fn deadline(&self, seconds: f32) -> f64 {
        self.elapsed + f64::from(seconds.max(0.0))
    }

    pub fn reached(&self, deadline: f64) -> bool {
        self.elapsed >= deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline() {
        let mut clock = DraftClock::new();
        let deadline = clock.deadline(0.5);
        assert!(!clock.reached(deadline));
        clock.advance(Duration::from_millis(250));
        assert!(!clock.reached(deadline));
        clock.advance(Duration::from_millis(250));
        assert!(clock.reached(deadline));
        // Negative delays count as zero
        assert!(clock.reached(clock.deadline(-1.0)));
    }
}
