//! # Random delay source for the timed actor phases.
//!
//! [`DelaySource`] supplies the sleep, eat and inspection pauses. The core
//! only requires a bounded positive duration; how it is drawn is pluggable so
//! tests can substitute a deterministic source.
//!
//! - [`UniformDelay`] — uniform in `[1ms, max]` (production default)
//! - [`FixedDelay`] — always the same duration (tests, demos)

use std::time::Duration;

use rand::Rng;

/// Supplier of bounded positive delays.
///
/// Implementations must return a duration in `[1ms, max]` for any `max`;
/// a zero `max` still yields the 1ms floor so no phase degenerates into a
/// busy loop.
pub trait DelaySource: Send + Sync + 'static {
    /// Draws the next delay, bounded by `max`.
    fn next(&self, max: Duration) -> Duration;
}

/// Uniformly distributed delay in `[1ms, max]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformDelay;

impl DelaySource for UniformDelay {
    fn next(&self, max: Duration) -> Duration {
        let mut rng = rand::rng();
        let ms = max.as_millis().min(u128::from(u64::MAX)) as u64;
        if ms <= 1 {
            return Duration::from_millis(1);
        }
        Duration::from_millis(rng.random_range(1..=ms))
    }
}

/// Deterministic delay source returning a constant duration.
///
/// Clamped to the same `[1ms, max]` contract as [`UniformDelay`].
#[derive(Clone, Copy, Debug)]
pub struct FixedDelay(pub Duration);

impl DelaySource for FixedDelay {
    fn next(&self, max: Duration) -> Duration {
        self.0.clamp(Duration::from_millis(1), max.max(Duration::from_millis(1)))
    }
}
