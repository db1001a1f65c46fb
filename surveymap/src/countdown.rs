// Copyright 2025 the Surveymap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Lets one tick in `rate + 1` through.
///
/// The first tick always fires. A rate of `0` fires on every tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RefreshCountdown {
    rate: u32,
    remaining: u32,
}

impl RefreshCountdown {
    /// Creates a countdown that fires on the next tick.
    pub fn new(rate: u32) -> Self {
        Self { rate, remaining: 0 }
    }

    /// Advances one tick; returns `true` if this tick fires.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            self.remaining = self.rate;
            true
        } else {
            self.remaining -= 1;
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rate_fires_every_tick() {
        let mut c = RefreshCountdown::new(0);
        assert!((0..5).all(|_| c.tick()));
    }

    #[test]
    fn rate_skips_ticks_between_firings() {
        let mut c = RefreshCountdown::new(2);
        let fired: Vec<bool> = (0..7).map(|_| c.tick()).collect();
        assert_eq!(fired, [true, false, false, true, false, false, true]);
    }

    #[test]
    fn first_tick_fires_at_any_rate() {
        let mut c = RefreshCountdown::new(5);
        assert!(c.tick());
        assert!(!c.tick());
    }
}
