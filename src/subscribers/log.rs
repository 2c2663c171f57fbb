//! # Debug log subscriber.
//!
//! [`LogWriter`] prints per-actor-action lines to stdout. It is attached
//! only when the binary runs with the debug flag; without it the simulation
//! is silent apart from the final diagnostic.
//!
//! ## Output format
//! ```text
//! [crosser-3] sleeping for 2000 ms
//! [crosser-3] waiting for a forward slot
//! [crosser-3] crossing forward
//! [crosser-3] made it across (forward)
//! ---- occupancy = 4
//! ALARM: 5 crossing (forward=3, backward=2)
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Stdout debug logger for the simulation trace.
///
/// Intended for the verbose debug mode; implement a custom [`Subscribe`]
/// for structured output or metrics.
#[derive(Default)]
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let actor = e.actor.as_deref().unwrap_or("?");
        match e.kind {
            EventKind::ActorStarted => {
                println!("[{actor}] alive");
            }
            EventKind::Sleeping => {
                println!("[{actor}] sleeping for {} ms", e.delay_ms.unwrap_or(0));
            }
            EventKind::Awake => {
                println!("[{actor}] awake");
            }
            EventKind::AwaitingSlot => {
                if let Some(dir) = e.direction {
                    println!("[{actor}] waiting for a {dir} slot");
                }
            }
            EventKind::SlotAcquired => {
                if let Some(dir) = e.direction {
                    println!("[{actor}] slot acquired ({dir})");
                }
            }
            EventKind::CrossingStarted => {
                if let Some(dir) = e.direction {
                    println!("[{actor}] crossing {dir}");
                }
            }
            EventKind::CrossingDone => {
                if let Some(dir) = e.direction {
                    println!("[{actor}] made it across ({dir})");
                }
            }
            EventKind::SlotReleased => {
                println!("[{actor}] slot released");
            }
            EventKind::Eating => {
                println!("[{actor}] eating for {} ms", e.delay_ms.unwrap_or(0));
            }
            EventKind::OccupancyObserved => {
                println!("---- occupancy = {}", e.count.unwrap_or(0));
            }
            EventKind::AlarmRaised => {
                println!(
                    "ALARM: {} crossing (forward={}, backward={})",
                    e.count.unwrap_or(0),
                    e.forward.unwrap_or(0),
                    e.backward.unwrap_or(0),
                );
            }
            EventKind::PileUpDetected => {
                println!(
                    "pile-up: forward={}, backward={}",
                    e.forward.unwrap_or(0),
                    e.backward.unwrap_or(0),
                );
            }
            EventKind::ShutdownRequested => {
                println!("[shutdown-requested]");
            }
            EventKind::AllStopped => {
                println!("[all-stopped]");
            }
            EventKind::SubscriberOverflow => {
                println!(
                    "[subscriber-overflow] {actor}: {}",
                    e.reason.as_deref().unwrap_or("?")
                );
            }
            EventKind::SubscriberPanicked => {
                println!(
                    "[subscriber-panicked] {actor}: {}",
                    e.reason.as_deref().unwrap_or("?")
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
