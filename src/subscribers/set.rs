//! # Trace delivery: fans bus events out to the attached subscribers.
//!
//! [`SubscriberSet`] consumes the event bus directly: a single worker task
//! reads the broadcast receiver and dispatches each event to every
//! subscriber in turn. The bus ring buffer is the only queue; if the worker
//! falls behind, the oldest events are skipped and the gap is reported as
//! `EventKind::SubscriberOverflow`.
//!
//! ## Rules
//! - Delivery is globally FIFO: every subscriber sees the same events in the
//!   same order.
//! - A panicking subscriber is isolated per dispatch and reported as
//!   `EventKind::SubscriberPanicked`; delivery continues with the next
//!   subscriber.
//! - [`SubscriberSet::shutdown`] delivers everything already published
//!   before the worker stops, so the tail of the trace survives process
//!   exit.

use std::any::Any;
use std::sync::{Arc, Mutex};

use futures::FutureExt;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Event};
use crate::subscribers::Subscribe;

/// Single-worker fan-out for event subscribers.
pub struct SubscriberSet {
    drain: CancellationToken,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl SubscriberSet {
    /// Attaches the subscribers to the bus and spawns the delivery worker.
    ///
    /// An empty set spawns nothing; the bus then simply drops events.
    #[must_use]
    pub fn new(subscribers: Vec<Arc<dyn Subscribe>>, bus: &Bus) -> Self {
        let drain = CancellationToken::new();
        if subscribers.is_empty() {
            return Self {
                drain,
                worker: Mutex::new(None),
            };
        }

        let mut rx = bus.subscribe();
        let reports = bus.clone();
        let stop = drain.clone();
        let worker = tokio::spawn(async move {
            loop {
                tokio::select! {
                    res = rx.recv() => match res {
                        Ok(ev) => dispatch(&subscribers, &ev, &reports).await,
                        Err(RecvError::Lagged(skipped)) => {
                            reports.publish(Event::subscriber_overflow(
                                "trace",
                                format!("worker lagged, skipped {skipped} events"),
                            ));
                        }
                        Err(RecvError::Closed) => break,
                    },
                    _ = stop.cancelled() => {
                        // Deliver whatever is already buffered, then stop.
                        loop {
                            match rx.try_recv() {
                                Ok(ev) => dispatch(&subscribers, &ev, &reports).await,
                                Err(TryRecvError::Lagged(_)) => continue,
                                Err(_) => break,
                            }
                        }
                        break;
                    }
                }
            }
        });

        Self {
            drain,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Delivers every event published so far, then stops the worker.
    ///
    /// Later calls are no-ops.
    pub async fn shutdown(&self) {
        self.drain.cancel();
        let handle = self.worker.lock().ok().and_then(|mut w| w.take());
        if let Some(h) = handle {
            let _ = h.await;
        }
    }
}

/// Delivers one event to every subscriber, isolating panics.
async fn dispatch(subscribers: &[Arc<dyn Subscribe>], ev: &Event, reports: &Bus) {
    for sub in subscribers {
        let fut = sub.on_event(ev);
        if let Err(payload) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
            reports.publish(Event::subscriber_panicked(
                sub.name(),
                panic_message(payload.as_ref()),
            ));
        }
    }
}

/// Best-effort extraction of a panic payload message.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
