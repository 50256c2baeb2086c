//! Retry bounds and wait strategies.

use std::time::Duration;

use rand::Rng;

/// How long to wait between attempts.
#[derive(Debug, Clone, PartialEq)]
pub enum WaitStrategy {
    /// Retry immediately.
    None,
    /// The same delay between every attempt.
    Fixed {
        /// Delay between attempts.
        delay: Duration,
    },
    /// Delay grows by `multiplier` per attempt, capped at `max`.
    ExponentialBackoff {
        /// Delay before the first retry.
        initial: Duration,
        /// Upper bound on any single delay.
        max: Duration,
        /// Growth factor per attempt.
        multiplier: f64,
    },
    /// Exponential backoff with each delay scaled by a random factor in
    /// `[0.5, 1.5)` to avoid thundering herds.
    ExponentialJitter {
        /// Delay before the first retry.
        initial: Duration,
        /// Upper bound on any single delay.
        max: Duration,
        /// Growth factor per attempt.
        multiplier: f64,
    },
}

impl WaitStrategy {
    /// The delay before the retry following failed attempt number
    /// `attempt` (1-based).
    pub fn calculate(&self, attempt: u32) -> Duration {
        match self {
            WaitStrategy::None => Duration::ZERO,
            WaitStrategy::Fixed { delay } => *delay,
            WaitStrategy::ExponentialBackoff {
                initial,
                max,
                multiplier,
            } => Self::exponential(*initial, *max, *multiplier, attempt),
            WaitStrategy::ExponentialJitter {
                initial,
                max,
                multiplier,
            } => {
                let base = Self::exponential(*initial, *max, *multiplier, attempt);
                let factor = rand::thread_rng().gen_range(0.5..1.5);
                let secs = base.as_secs_f64() * factor;
                if secs < max.as_secs_f64() {
                    Duration::from_secs_f64(secs)
                } else {
                    *max
                }
            }
        }
    }

    fn exponential(initial: Duration, max: Duration, multiplier: f64, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(32);
        let factor = multiplier.powi(exponent as i32);
        // Computed in f64 seconds so a large factor saturates at `max`
        // instead of overflowing `Duration` arithmetic.
        let secs = initial.as_secs_f64() * factor;
        if secs.is_finite() && secs < max.as_secs_f64() {
            Duration::from_secs_f64(secs)
        } else {
            max
        }
    }
}

impl Default for WaitStrategy {
    fn default() -> Self {
        WaitStrategy::ExponentialBackoff {
            initial: Duration::from_millis(500),
            max: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

/// Bounds and pacing for one retried operation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RetryConfig {
    /// Retries after the first attempt; `max_retries = 3` allows four
    /// attempts in total.
    pub max_retries: u32,
    /// Delay policy between attempts.
    pub wait: WaitStrategy,
}

impl RetryConfig {
    /// Default config: 3 retries with exponential backoff.
    pub fn new() -> Self {
        Self {
            max_retries: 3,
            ..Default::default()
        }
    }

    /// A config that never retries.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            wait: WaitStrategy::None,
        }
    }

    /// Set the retry bound.
    pub fn max_retries(mut self, value: u32) -> Self {
        self.max_retries = value;
        self
    }

    /// Set the wait strategy.
    pub fn wait(mut self, strategy: WaitStrategy) -> Self {
        self.wait = strategy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_strategy_is_constant() {
        let strategy = WaitStrategy::Fixed {
            delay: Duration::from_millis(100),
        };
        assert_eq!(strategy.calculate(1), Duration::from_millis(100));
        assert_eq!(strategy.calculate(5), Duration::from_millis(100));
    }

    #[test]
    fn exponential_backoff_doubles_and_caps() {
        let strategy = WaitStrategy::ExponentialBackoff {
            initial: Duration::from_millis(100),
            max: Duration::from_millis(350),
            multiplier: 2.0,
        };
        assert_eq!(strategy.calculate(1), Duration::from_millis(100));
        assert_eq!(strategy.calculate(2), Duration::from_millis(200));
        assert_eq!(strategy.calculate(3), Duration::from_millis(350));
        assert_eq!(strategy.calculate(10), Duration::from_millis(350));
    }

    #[test]
    fn huge_growth_factor_saturates_at_the_cap() {
        let strategy = WaitStrategy::ExponentialBackoff {
            initial: Duration::from_millis(500),
            max: Duration::from_secs(30),
            multiplier: 8.0,
        };
        // 8^32 overflows Duration arithmetic outright; the cap must win.
        assert_eq!(strategy.calculate(33), Duration::from_secs(30));
        assert_eq!(strategy.calculate(u32::MAX), Duration::from_secs(30));
    }

    #[test]
    fn jitter_stays_within_bounds() {
        let strategy = WaitStrategy::ExponentialJitter {
            initial: Duration::from_millis(100),
            max: Duration::from_secs(1),
            multiplier: 2.0,
        };
        for attempt in 1..6 {
            let wait = strategy.calculate(attempt);
            assert!(wait >= Duration::from_millis(50), "attempt {attempt}: {wait:?}");
            assert!(wait <= Duration::from_secs(1), "attempt {attempt}: {wait:?}");
        }
    }

    #[test]
    fn disabled_config_has_no_retries() {
        let config = RetryConfig::disabled();
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.wait, WaitStrategy::None);
    }
}
