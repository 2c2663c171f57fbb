//! # Corridor: the shared bounded resource.
//!
//! [`Corridor`] is the synchronization core of the simulation. It combines
//! two deliberately separate mechanisms:
//!
//! - an **occupancy semaphore** — the hard capacity guarantee. Acquiring a
//!   slot blocks until one is free; the [`SlotGuard`] returns it on drop, so
//!   a slot can never leak even on an error path.
//! - **directional counters** — an observability and violation-detection
//!   layer on top. Each counter has its own mutex so the two flows are never
//!   serialized through a single lock, and reads of the pair are an
//!   intentionally racy snapshot. The safety property of the system rests on
//!   the semaphore, not on these counts.
//!
//! Locks here are held only around a single counter update, never across a
//! sleep or the simulated crossing hold.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::SimError;

/// Direction of one crossing leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Outbound leg.
    Forward,
    /// Return leg.
    Backward,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => f.write_str("forward"),
            Direction::Backward => f.write_str("backward"),
        }
    }
}

/// The capacity-bounded shared corridor.
///
/// Created once by the [`Supervisor`](crate::Supervisor) and shared with
/// every actor behind an `Arc`; all mutation goes through its methods.
pub struct Corridor {
    /// Occupancy slots; initial value is the configured capacity.
    slots: Arc<Semaphore>,
    capacity: usize,
    one_way: bool,

    /// Crossers currently mid-transit, per direction. Independent locks.
    forward: Mutex<u32>,
    backward: Mutex<u32>,

    /// Actors currently holding a slot. Approximate debug signal only;
    /// the alarm check never reads it.
    occupancy: Mutex<u32>,

    /// Cumulative finished crossing legs, for end-of-run accounting.
    completed: AtomicU64,
}

/// RAII handle for one occupancy slot.
///
/// Dropping the guard returns the slot to the semaphore and decrements the
/// occupancy counter exactly once, on any exit path.
pub struct SlotGuard {
    _permit: OwnedSemaphorePermit,
    corridor: Arc<Corridor>,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        // The permit itself is returned by its own drop. A poisoned lock
        // only loses a debug-signal update, so it is skipped rather than
        // propagated out of a destructor.
        if let Ok(mut n) = self.corridor.occupancy.lock() {
            *n = n.saturating_sub(1);
        }
    }
}

impl Corridor {
    /// Creates a corridor with `capacity` occupancy slots.
    pub fn new(capacity: usize, one_way: bool) -> Self {
        Self {
            slots: Arc::new(Semaphore::new(capacity)),
            capacity,
            one_way,
            forward: Mutex::new(0),
            backward: Mutex::new(0),
            occupancy: Mutex::new(0),
            completed: AtomicU64::new(0),
        }
    }

    /// Waits for a free occupancy slot and claims it.
    ///
    /// Blocks while the corridor is at capacity. A failure of the underlying
    /// wait primitive surfaces as [`SimError::Internal`] and skips the
    /// occupancy bump; the caller's actor terminates rather than looping on
    /// in an inconsistent state.
    pub async fn acquire_slot(self: &Arc<Self>) -> Result<SlotGuard, SimError> {
        let permit = Arc::clone(&self.slots)
            .acquire_owned()
            .await
            .map_err(|e| SimError::Internal {
                error: format!("occupancy slot wait failed: {e}"),
            })?;

        {
            let mut n = self.occupancy.lock().map_err(|_| SimError::Internal {
                error: "occupancy counter lock poisoned".to_string(),
            })?;
            *n += 1;
        }

        Ok(SlotGuard {
            _permit: permit,
            corridor: Arc::clone(self),
        })
    }

    /// Registers the start of a crossing leg.
    ///
    /// Increments the matching directional counter under its own mutex, then
    /// checks the opposite counter. Opposing traffic under the one-way policy
    /// is a protocol violation: the method reports both directional counts in
    /// [`SimError::PileUp`] and the run aborts.
    pub fn begin_crossing(&self, direction: Direction) -> Result<(), SimError> {
        {
            let mut n = self.lock_counter(direction)?;
            *n += 1;
        }

        if self.one_way {
            let opposing = *self.lock_counter(direction.opposite())?;
            if opposing > 0 {
                let (forward, backward) = self.directional_counts()?;
                return Err(SimError::PileUp { forward, backward });
            }
        }
        Ok(())
    }

    /// Registers the end of a crossing leg.
    ///
    /// Must be called exactly once per successful [`Self::begin_crossing`],
    /// by the same actor. Decrementing past zero is a contract violation.
    pub fn end_crossing(&self, direction: Direction) -> Result<(), SimError> {
        {
            let mut n = self.lock_counter(direction)?;
            debug_assert!(*n > 0, "end_crossing without matching begin_crossing");
            *n = n.saturating_sub(1);
        }
        self.completed.fetch_add(1, AtomicOrdering::Relaxed);
        Ok(())
    }

    /// Reads both directional counters, each under its own lock.
    ///
    /// There is no combined lock: the snapshot is approximate, which the
    /// threshold check tolerates.
    pub fn directional_counts(&self) -> Result<(u32, u32), SimError> {
        let forward = *self.lock_counter(Direction::Forward)?;
        let backward = *self.lock_counter(Direction::Backward)?;
        Ok((forward, backward))
    }

    /// Sum of the two directional counters (racy snapshot).
    pub fn total_crossing(&self) -> Result<u32, SimError> {
        let (forward, backward) = self.directional_counts()?;
        Ok(forward + backward)
    }

    /// Actors currently holding an occupancy slot. Debug signal only.
    pub fn occupancy(&self) -> u32 {
        self.occupancy.lock().map(|n| *n).unwrap_or(0)
    }

    /// Free occupancy slots right now.
    pub fn available_slots(&self) -> usize {
        self.slots.available_permits()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Cumulative finished crossing legs.
    pub fn completed_crossings(&self) -> u64 {
        self.completed.load(AtomicOrdering::Relaxed)
    }

    fn lock_counter(&self, direction: Direction) -> Result<std::sync::MutexGuard<'_, u32>, SimError> {
        let counter = match direction {
            Direction::Forward => &self.forward,
            Direction::Backward => &self.backward,
        };
        counter.lock().map_err(|_| SimError::Internal {
            error: format!("{direction} crossing counter lock poisoned"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[test]
    fn direction_opposite_flips() {
        assert_eq!(Direction::Forward.opposite(), Direction::Backward);
        assert_eq!(Direction::Backward.opposite(), Direction::Forward);
        assert_eq!(Direction::Forward.to_string(), "forward");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn occupancy_never_exceeds_capacity() {
        let capacity = 3;
        let corridor = Arc::new(Corridor::new(capacity, false));
        let inside = Arc::new(AtomicU32::new(0));
        let peak = Arc::new(AtomicU32::new(0));

        let mut handles = Vec::new();
        for _ in 0..12 {
            let corridor = Arc::clone(&corridor);
            let inside = Arc::clone(&inside);
            let peak = Arc::clone(&peak);
            handles.push(tokio::spawn(async move {
                for _ in 0..5 {
                    let guard = corridor.acquire_slot().await.unwrap();
                    let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    assert!(now as usize <= capacity, "{now} actors inside");
                    assert!(corridor.occupancy() as usize <= capacity);
                    tokio::time::sleep(Duration::from_millis(1)).await;
                    inside.fetch_sub(1, Ordering::SeqCst);
                    drop(guard);
                }
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) as usize <= capacity);
        assert_eq!(corridor.available_slots(), capacity);
        assert_eq!(corridor.occupancy(), 0);
    }

    #[tokio::test]
    async fn guard_returns_slot_on_drop() {
        let corridor = Arc::new(Corridor::new(2, false));
        let guard = corridor.acquire_slot().await.unwrap();
        assert_eq!(corridor.available_slots(), 1);
        assert_eq!(corridor.occupancy(), 1);
        drop(guard);
        assert_eq!(corridor.available_slots(), 2);
        assert_eq!(corridor.occupancy(), 0);
    }

    #[tokio::test]
    async fn slot_released_on_pile_up_error_path() {
        let corridor = Arc::new(Corridor::new(4, true));

        // Simulated opposing traffic already mid-transit.
        corridor.begin_crossing(Direction::Backward).unwrap();

        let guard = corridor.acquire_slot().await.unwrap();
        let err = corridor.begin_crossing(Direction::Forward).unwrap_err();
        match err {
            SimError::PileUp { forward, backward } => {
                assert_eq!(forward, 1);
                assert_eq!(backward, 1);
            }
            other => panic!("expected pile-up, got {other:?}"),
        }

        // The scoped guard still frees the slot despite the error.
        drop(guard);
        assert_eq!(corridor.available_slots(), 4);
        assert_eq!(corridor.occupancy(), 0);
    }

    #[test]
    fn bidirectional_traffic_allowed_without_one_way() {
        let corridor = Corridor::new(4, false);
        corridor.begin_crossing(Direction::Forward).unwrap();
        corridor.begin_crossing(Direction::Backward).unwrap();
        assert_eq!(corridor.total_crossing().unwrap(), 2);
        corridor.end_crossing(Direction::Forward).unwrap();
        corridor.end_crossing(Direction::Backward).unwrap();
        assert_eq!(corridor.total_crossing().unwrap(), 0);
        assert_eq!(corridor.completed_crossings(), 2);
    }

    #[test]
    fn counters_stay_balanced_over_many_legs() {
        let corridor = Corridor::new(4, false);
        for _ in 0..50 {
            corridor.begin_crossing(Direction::Forward).unwrap();
            corridor.end_crossing(Direction::Forward).unwrap();
            corridor.begin_crossing(Direction::Backward).unwrap();
            corridor.end_crossing(Direction::Backward).unwrap();
        }
        let (forward, backward) = corridor.directional_counts().unwrap();
        assert_eq!(forward, 0);
        assert_eq!(backward, 0);
        assert_eq!(corridor.completed_crossings(), 100);
    }

    #[tokio::test]
    async fn acquire_blocks_at_capacity_until_release() {
        let corridor = Arc::new(Corridor::new(1, false));
        let first = corridor.acquire_slot().await.unwrap();

        let waiter = {
            let corridor = Arc::clone(&corridor);
            tokio::spawn(async move {
                let _guard = corridor.acquire_slot().await.unwrap();
            })
        };

        // The second acquire cannot complete while the slot is held.
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        drop(first);
        waiter.await.unwrap();
        assert_eq!(corridor.available_slots(), 1);
    }
}
