//! Retry scheduling
//!
//! Failed attempts are not retried immediately. The harvester waits here
//! before the next attempt; the wait is a non-blocking `tokio` sleep, so the
//! runtime stays responsive while the loop is parked.

use crate::config::{BackoffKind, RetryConfig};
use std::time::Duration;

/// How long to wait before the next attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffStrategy {
    /// The same delay after every failure
    Fixed(Duration),

    /// `base * 2^(streak - 1)`, capped at `max`
    Exponential { base: Duration, max: Duration },
}

/// Computes and waits out retry delays
#[derive(Debug, Clone)]
pub struct RetryScheduler {
    strategy: BackoffStrategy,
}

impl RetryScheduler {
    pub fn new(strategy: BackoffStrategy) -> Self {
        Self { strategy }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        let base = Duration::from_millis(config.delay);
        let strategy = match config.strategy {
            BackoffKind::Fixed => BackoffStrategy::Fixed(base),
            BackoffKind::Exponential => BackoffStrategy::Exponential {
                base,
                max: Duration::from_millis(config.max_delay),
            },
        };
        Self::new(strategy)
    }

    pub fn strategy(&self) -> BackoffStrategy {
        self.strategy
    }

    /// Delay before the next attempt, given the current stuck streak
    pub fn delay_for(&self, streak: u32) -> Duration {
        match self.strategy {
            BackoffStrategy::Fixed(delay) => delay,
            BackoffStrategy::Exponential { base, max } => {
                let factor = 1u32
                    .checked_shl(streak.saturating_sub(1))
                    .unwrap_or(u32::MAX);
                base.saturating_mul(factor).min(max)
            }
        }
    }

    /// Sleeps for the delay that belongs to `streak`
    pub async fn wait(&self, streak: u32) {
        let delay = self.delay_for(streak);
        if !delay.is_zero() {
            tracing::trace!("Waiting {:?} before the next attempt", delay);
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for RetryScheduler {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_fixed_100ms() {
        let scheduler = RetryScheduler::default();
        assert_eq!(
            scheduler.strategy(),
            BackoffStrategy::Fixed(Duration::from_millis(100))
        );
        assert_eq!(scheduler.delay_for(1), Duration::from_millis(100));
        assert_eq!(scheduler.delay_for(49), Duration::from_millis(100));
    }

    #[test]
    fn test_exponential_doubles_and_caps() {
        let scheduler = RetryScheduler::new(BackoffStrategy::Exponential {
            base: Duration::from_millis(100),
            max: Duration::from_millis(1_000),
        });

        assert_eq!(scheduler.delay_for(0), Duration::from_millis(100));
        assert_eq!(scheduler.delay_for(1), Duration::from_millis(100));
        assert_eq!(scheduler.delay_for(2), Duration::from_millis(200));
        assert_eq!(scheduler.delay_for(4), Duration::from_millis(800));
        assert_eq!(scheduler.delay_for(5), Duration::from_millis(1_000));
        assert_eq!(scheduler.delay_for(200), Duration::from_millis(1_000));
    }

    #[test]
    fn test_from_config() {
        let config = RetryConfig {
            delay: 250,
            strategy: BackoffKind::Exponential,
            max_delay: 4_000,
            ..RetryConfig::default()
        };
        assert_eq!(
            RetryScheduler::from_config(&config).strategy(),
            BackoffStrategy::Exponential {
                base: Duration::from_millis(250),
                max: Duration::from_millis(4_000),
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_sleeps_for_delay() {
        let scheduler = RetryScheduler::new(BackoffStrategy::Fixed(Duration::from_secs(5)));
        let start = tokio::time::Instant::now();
        scheduler.wait(1).await;
        assert!(start.elapsed() >= Duration::from_secs(5));
    }
}
