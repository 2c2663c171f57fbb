//! Event subscribers: the [`Subscribe`] trait, the fan-out set, and the
//! built-in stdout [`LogWriter`] used by the debug mode.

mod log;
mod set;
mod subscriber;

pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
