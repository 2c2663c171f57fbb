//! # Monitor actor: periodic occupancy inspection.
//!
//! A monitor sleeps for a random bounded interval, then reads the two
//! directional counters and raises the alarm if their sum exceeds the
//! configured threshold. Monitors are independent and uncoordinated; with
//! more than one, several may observe the same violation, and the supervisor
//! reacts to whichever joins first — the process still exits exactly once.

use std::sync::Arc;

use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::config::SimConfig;
use crate::core::corridor::Corridor;
use crate::delay::DelaySource;
use crate::error::SimError;
use crate::events::{Bus, Event, EventKind};

/// A single corridor inspector.
pub struct Monitor {
    name: Arc<str>,
    corridor: Arc<Corridor>,
    cfg: SimConfig,
    bus: Bus,
    delay: Arc<dyn DelaySource>,
}

impl Monitor {
    /// Creates a monitor with the given ordinal identity.
    pub fn new(
        id: usize,
        corridor: Arc<Corridor>,
        cfg: SimConfig,
        bus: Bus,
        delay: Arc<dyn DelaySource>,
    ) -> Self {
        Self {
            name: format!("monitor-{id}").into(),
            corridor,
            cfg,
            bus,
            delay,
        }
    }

    /// Runs the inspection loop until the token is cancelled.
    ///
    /// Returns [`SimError::Overload`] when the crossing sum exceeds the
    /// threshold; the supervisor turns that into the abnormal exit.
    pub async fn run(self, token: CancellationToken) -> Result<(), SimError> {
        self.bus
            .publish(Event::now(EventKind::ActorStarted).with_actor(self.name.clone()));

        while !token.is_cancelled() {
            let d = self.delay.next(self.cfg.max_monitor_sleep);
            self.bus.publish(
                Event::now(EventKind::Sleeping)
                    .with_actor(self.name.clone())
                    .with_delay(d),
            );
            time::sleep(d).await;

            // Occupancy is a racy debug signal; the check below uses the
            // directional counters instead.
            self.bus.publish(
                Event::now(EventKind::OccupancyObserved)
                    .with_actor(self.name.clone())
                    .with_count(self.corridor.occupancy()),
            );

            let (forward, backward) = self.corridor.directional_counts()?;
            let total = forward + backward;
            if total > self.cfg.threshold {
                self.bus.publish(
                    Event::now(EventKind::AlarmRaised)
                        .with_actor(self.name.clone())
                        .with_flow(forward, backward)
                        .with_count(total),
                );
                return Err(SimError::Overload {
                    forward,
                    backward,
                    total,
                    threshold: self.cfg.threshold,
                });
            }
        }
        Ok(())
    }
}
