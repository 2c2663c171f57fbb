//! # crossvisor
//!
//! **Crossvisor** is a bounded-resource concurrency simulation: a population
//! of crosser actors repeatedly traverses a shared corridor with limited
//! capacity, while monitor actors periodically inspect directional flow and
//! abort the whole run if the crossing sum exceeds a threshold.
//!
//! The interesting part is the synchronization contract, not the workload:
//! a counting semaphore bounds concurrent occupancy, mutex-protected
//! directional counters track flow for violation detection, and a
//! cancellation token drives a race-free cooperative shutdown after a fixed
//! run duration.
//!
//! ## Architecture
//! ```text
//!   Supervisor ── owns ──► Corridor { semaphore, forward/backward counters }
//!       │                        ▲                ▲
//!       ├── spawns ──► Crosser ──┘ (acquire/cross/release, both directions)
//!       ├── spawns ──► Monitor ───┘ (periodic threshold check → alarm)
//!       │
//!       └── Bus (broadcast) ──► SubscriberSet ──► LogWriter / custom
//! ```
//!
//! ## Lifecycle
//! ```text
//! Supervisor::run()
//!   ├─► spawn crossers + monitors (CancellationToken children, JoinSet)
//!   ├─► wait: run_for deadline | OS signal | actor error
//!   ├─► cancel token → every actor finishes its current full cycle
//!   └─► join all → Ok, or the alarm error that aborted the run
//! ```
//!
//! ## Example
//! ```no_run
//! use std::time::Duration;
//! use crossvisor::{SimConfig, Supervisor};
//!
//! #[tokio::main(flavor = "multi_thread")]
//! async fn main() {
//!     let cfg = SimConfig {
//!         run_for: Duration::from_secs(5),
//!         ..SimConfig::default()
//!     };
//!     let sup = Supervisor::new(cfg, Vec::new());
//!     if let Err(e) = sup.run().await {
//!         eprintln!("{e}");
//!     }
//! }
//! ```

mod config;
mod core;
mod delay;
mod error;
mod events;
mod subscribers;

// ---- Public re-exports ----

pub use crate::config::SimConfig;
pub use crate::core::{Corridor, Crosser, Direction, Monitor, SlotGuard, Supervisor};
pub use crate::delay::{DelaySource, FixedDelay, UniformDelay};
pub use crate::error::{SimError, ABNORMAL_EXIT};
pub use crate::events::{Bus, Event, EventKind};
pub use crate::subscribers::{LogWriter, Subscribe, SubscriberSet};
