//! # Runtime events emitted by the supervisor and actors.
//!
//! [`EventKind`] classifies everything the simulation reports: per-phase
//! crosser actions, monitor inspections, the two alarm outcomes, shutdown
//! progress, and the subscriber self-reports (overflow/panic).
//!
//! [`Event`] carries the metadata: timestamp, actor name, direction, counts.
//! Each event has a globally unique `seq` that increases monotonically, so
//! consumers can restore order if delivery interleaves.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::core::Direction;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of simulation events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    SubscriberPanicked,
    /// The delivery worker lagged behind the bus and skipped events.
    SubscriberOverflow,

    // === Actor lifecycle ===
    /// Actor task has started its loop.
    ///
    /// Sets: `actor`.
    ActorStarted,

    // === Crosser phases ===
    /// Crosser entered its sleep phase.
    ///
    /// Sets: `actor`, `delay_ms`.
    Sleeping,
    /// Crosser woke up from the sleep phase.
    Awake,
    /// Crosser is waiting for a free occupancy slot.
    ///
    /// Sets: `actor`, `direction`.
    AwaitingSlot,
    /// Crosser obtained an occupancy slot.
    SlotAcquired,
    /// Crosser entered the corridor.
    ///
    /// Sets: `actor`, `direction`.
    CrossingStarted,
    /// Crosser left the corridor on the far side.
    CrossingDone,
    /// Crosser returned its occupancy slot.
    SlotReleased,
    /// Crosser entered its eat phase.
    ///
    /// Sets: `actor`, `delay_ms`.
    Eating,

    // === Monitor observations ===
    /// Monitor woke up and observed current slot occupancy.
    ///
    /// Sets: `actor`, `count` (occupancy; approximate debug signal).
    OccupancyObserved,
    /// Monitor found the crossing sum above threshold and is aborting the run.
    ///
    /// Sets: `actor`, `forward`, `backward`, `count` (the sum).
    AlarmRaised,

    // === Protocol violations ===
    /// Crosser detected opposing traffic under the one-way policy.
    ///
    /// Sets: `actor`, `forward`, `backward`.
    PileUpDetected,

    // === Shutdown ===
    /// Cooperative shutdown requested (run duration elapsed or OS signal).
    ShutdownRequested,
    /// Every actor observed the cancellation and returned.
    AllStopped,
}

/// Simulation event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the reporting actor, if applicable.
    pub actor: Option<Arc<str>>,
    /// Crossing direction, for the crosser phase events.
    pub direction: Option<Direction>,
    /// Phase duration in milliseconds (sleep/eat).
    pub delay_ms: Option<u32>,
    /// Single observed count (occupancy or crossing sum).
    pub count: Option<u32>,
    /// Forward directional counter at observation time.
    pub forward: Option<u32>,
    /// Backward directional counter at observation time.
    pub backward: Option<u32>,
    /// Human-readable reason (overflow/panic details).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// the next global sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            actor: None,
            direction: None,
            delay_ms: None,
            count: None,
            forward: None,
            backward: None,
            reason: None,
        }
    }

    /// Attaches the reporting actor's name.
    #[inline]
    pub fn with_actor(mut self, actor: impl Into<Arc<str>>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Attaches a crossing direction.
    #[inline]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Attaches a phase duration (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches a single observed count.
    #[inline]
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// Attaches both directional counters.
    #[inline]
    pub fn with_flow(mut self, forward: u32, backward: u32) -> Self {
        self.forward = Some(forward);
        self.backward = Some(backward);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: impl Into<Arc<str>>) -> Self {
        Event::now(EventKind::SubscriberOverflow)
            .with_actor(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::now(EventKind::SubscriberPanicked)
            .with_actor(subscriber)
            .with_reason(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_is_monotonic() {
        let a = Event::now(EventKind::ActorStarted);
        let b = Event::now(EventKind::Sleeping);
        let c = Event::now(EventKind::Awake);
        assert!(a.seq < b.seq);
        assert!(b.seq < c.seq);
    }

    #[test]
    fn builders_set_fields() {
        let ev = Event::now(EventKind::AlarmRaised)
            .with_actor("monitor-0")
            .with_flow(3, 2)
            .with_count(5);
        assert_eq!(ev.actor.as_deref(), Some("monitor-0"));
        assert_eq!(ev.forward, Some(3));
        assert_eq!(ev.backward, Some(2));
        assert_eq!(ev.count, Some(5));
        assert_eq!(ev.kind, EventKind::AlarmRaised);
    }

    #[test]
    fn delay_is_stored_as_millis() {
        let ev = Event::now(EventKind::Sleeping).with_delay(Duration::from_secs(2));
        assert_eq!(ev.delay_ms, Some(2000));
    }
}
