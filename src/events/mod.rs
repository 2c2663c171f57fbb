//! Simulation events: data model and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] — classification and payload metadata
//! - [`Bus`] — thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Supervisor`, `Crosser`, `Monitor`, the delivery
//!   worker (overflow/panic self-reports).
//! - **Consumer**: the [`SubscriberSet`](crate::SubscriberSet) delivery
//!   worker, which fans events out to the subscribers.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
