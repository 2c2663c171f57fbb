//! # Global simulation configuration.
//!
//! Provides [`SimConfig`], the fixed set of startup constants consumed by the
//! [`Supervisor`](crate::Supervisor) and handed down to every actor.
//!
//! ## Field semantics
//! - `capacity`: occupancy slots in the corridor (hard bound via semaphore)
//! - `threshold`: crossing sum above which a monitor raises the alarm
//! - `one_way`: enables strict unidirectional enforcement (pile-up detection)
//! - `run_for`: total wall-clock run duration before cooperative shutdown
//!
//! ## Notes
//! `capacity = 0` is an accepted misconfiguration: every crosser blocks on
//! slot acquisition forever and the run never joins. The supervisor does not
//! guard against it.

use std::time::Duration;

/// Startup constants for one simulation run.
///
/// Defaults reproduce the classic exercise: 10 crossers, 2 monitors,
/// 4 occupancy slots, 30 seconds of wall-clock time.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Number of crosser actors to spawn.
    pub crossers: usize,

    /// Number of monitor actors to spawn.
    pub monitors: usize,

    /// Occupancy slots in the corridor (initial semaphore value).
    pub capacity: usize,

    /// Crossing sum above which a monitor aborts the run.
    ///
    /// Defaults to the corridor capacity. A threshold below capacity makes
    /// the alarm reachable under normal load; at or above capacity it only
    /// fires if the crossing protocol is broken.
    pub threshold: u32,

    /// Time one crossing leg takes (held without any lock).
    pub cross_time: Duration,

    /// Upper bound for a crosser's random sleep phase.
    pub max_sleep: Duration,

    /// Upper bound for a crosser's random eat phase.
    pub max_eat: Duration,

    /// Upper bound for a monitor's random sleep between inspections.
    pub max_monitor_sleep: Duration,

    /// Total wall-clock run duration before the supervisor cancels all actors.
    pub run_for: Duration,

    /// Enforce strict unidirectional traffic.
    ///
    /// When set, a crosser that begins a crossing while opposing traffic is
    /// mid-transit aborts the run with a pile-up diagnostic.
    pub one_way: bool,

    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,
}

impl Default for SimConfig {
    /// Default configuration:
    ///
    /// - `crossers = 10`, `monitors = 2`
    /// - `capacity = 4`, `threshold = 4` (alarm unreachable unless forced)
    /// - `cross_time = 2s`, `max_sleep = 3s`, `max_eat = 5s`, `max_monitor_sleep = 3s`
    /// - `run_for = 30s`
    /// - `one_way = false`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            crossers: 10,
            monitors: 2,
            capacity: 4,
            threshold: 4,
            cross_time: Duration::from_secs(2),
            max_sleep: Duration::from_secs(3),
            max_eat: Duration::from_secs(5),
            max_monitor_sleep: Duration::from_secs(3),
            run_for: Duration::from_secs(30),
            one_way: false,
            bus_capacity: 1024,
        }
    }
}

impl SimConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_exercise() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.crossers, 10);
        assert_eq!(cfg.monitors, 2);
        assert_eq!(cfg.capacity, 4);
        assert_eq!(cfg.threshold, cfg.capacity as u32);
        assert_eq!(cfg.cross_time, Duration::from_secs(2));
        assert_eq!(cfg.run_for, Duration::from_secs(30));
        assert!(!cfg.one_way);
    }

    #[test]
    fn bus_capacity_is_clamped() {
        let cfg = SimConfig {
            bus_capacity: 0,
            ..SimConfig::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
