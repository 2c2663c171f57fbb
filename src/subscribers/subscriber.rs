//! # Event subscriber trait.
//!
//! [`Subscribe`] is the extension point for observing the simulation trace.
//! Subscribers are driven by the [`SubscriberSet`](crate::SubscriberSet)
//! delivery worker: events arrive one at a time, in publish order, shared
//! with every other subscriber in the set.
//!
//! ## Rules
//! - Delivery is sequential for the whole set; a slow subscriber slows the
//!   trace, which is acceptable for a debug logger.
//! - Panics are caught per dispatch and reported as
//!   `EventKind::SubscriberPanicked`; delivery continues.

use async_trait::async_trait;

use crate::events::Event;

/// Event subscriber for simulation observability.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from the delivery worker, never in the publisher context.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in panic reports.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
