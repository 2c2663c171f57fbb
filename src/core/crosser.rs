//! # Crosser actor: one worker cycling through the corridor.
//!
//! Each crosser runs an unbounded loop:
//!
//! ```text
//! loop {
//!   ├─► sleep (random, ≤ max_sleep)
//!   ├─► forward leg:  acquire slot → begin crossing → hold cross_time
//!   │                 → end crossing → release slot
//!   ├─► eat (random, ≤ max_eat)
//!   └─► backward leg: same, reversed
//! }
//! ```
//!
//! ## Rules
//! - Cancellation is observed at **loop-top only**: an actor mid-cycle
//!   finishes the full cycle before exiting.
//! - The slot is held through a [`SlotGuard`], so it is returned on every
//!   path including the pile-up abort.
//! - No lock is held during the simulated crossing hold; that hold is the
//!   window the monitors are meant to observe.

use std::sync::Arc;

use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::config::SimConfig;
use crate::core::corridor::{Corridor, Direction};
use crate::delay::DelaySource;
use crate::error::SimError;
use crate::events::{Bus, Event, EventKind};

/// A single corridor-crossing worker.
pub struct Crosser {
    name: Arc<str>,
    corridor: Arc<Corridor>,
    cfg: SimConfig,
    bus: Bus,
    delay: Arc<dyn DelaySource>,
}

impl Crosser {
    /// Creates a crosser with the given ordinal identity.
    pub fn new(
        id: usize,
        corridor: Arc<Corridor>,
        cfg: SimConfig,
        bus: Bus,
        delay: Arc<dyn DelaySource>,
    ) -> Self {
        Self {
            name: format!("crosser-{id}").into(),
            corridor,
            cfg,
            bus,
            delay,
        }
    }

    /// Runs the crossing cycle until the token is cancelled.
    ///
    /// Returns `Err` only for terminal conditions (pile-up under the one-way
    /// policy, primitive failure); the supervisor reacts by cancelling the
    /// whole run.
    pub async fn run(self, token: CancellationToken) -> Result<(), SimError> {
        self.bus
            .publish(Event::now(EventKind::ActorStarted).with_actor(self.name.clone()));

        while !token.is_cancelled() {
            self.doze().await;
            self.traverse(Direction::Forward).await?;
            self.eat().await;
            self.traverse(Direction::Backward).await?;
        }
        Ok(())
    }

    /// Sleep phase (idling before the next round trip).
    async fn doze(&self) {
        let d = self.delay.next(self.cfg.max_sleep);
        self.bus.publish(
            Event::now(EventKind::Sleeping)
                .with_actor(self.name.clone())
                .with_delay(d),
        );
        time::sleep(d).await;
        self.bus
            .publish(Event::now(EventKind::Awake).with_actor(self.name.clone()));
    }

    /// Eat phase on the far side.
    async fn eat(&self) {
        let d = self.delay.next(self.cfg.max_eat);
        self.bus.publish(
            Event::now(EventKind::Eating)
                .with_actor(self.name.clone())
                .with_delay(d),
        );
        time::sleep(d).await;
    }

    /// One full leg: wait for a slot, cross, give the slot back.
    async fn traverse(&self, direction: Direction) -> Result<(), SimError> {
        self.bus.publish(
            Event::now(EventKind::AwaitingSlot)
                .with_actor(self.name.clone())
                .with_direction(direction),
        );

        // The only blocking point besides timed sleeps.
        let guard = self.corridor.acquire_slot().await?;
        self.bus.publish(
            Event::now(EventKind::SlotAcquired)
                .with_actor(self.name.clone())
                .with_direction(direction),
        );

        // On a pile-up the guard drops here and the slot is still returned.
        self.cross(direction).await?;

        drop(guard);
        self.bus.publish(
            Event::now(EventKind::SlotReleased)
                .with_actor(self.name.clone())
                .with_direction(direction),
        );
        Ok(())
    }

    /// The crossing itself: counter up, timed hold with no lock, counter down.
    async fn cross(&self, direction: Direction) -> Result<(), SimError> {
        self.bus.publish(
            Event::now(EventKind::CrossingStarted)
                .with_actor(self.name.clone())
                .with_direction(direction),
        );

        if let Err(e) = self.corridor.begin_crossing(direction) {
            if let SimError::PileUp { forward, backward } = &e {
                self.bus.publish(
                    Event::now(EventKind::PileUpDetected)
                        .with_actor(self.name.clone())
                        .with_flow(*forward, *backward),
                );
            }
            return Err(e);
        }

        time::sleep(self.cfg.cross_time).await;
        self.corridor.end_crossing(direction)?;

        self.bus.publish(
            Event::now(EventKind::CrossingDone)
                .with_actor(self.name.clone())
                .with_direction(direction),
        );
        Ok(())
    }
}
