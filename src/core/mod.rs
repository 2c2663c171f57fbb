//! Simulation core: the shared corridor, the actors, and orchestration.
//!
//! Internal modules:
//! - [`corridor`]: the capacity semaphore plus directional counters;
//! - [`crosser`]: one crossing worker's cycle;
//! - [`monitor`]: periodic threshold inspection;
//! - [`supervisor`]: spawning, the timed run, cooperative shutdown;
//! - [`shutdown`]: OS signal handling for ending a run early.

mod corridor;
mod crosser;
mod monitor;
mod shutdown;
mod supervisor;

pub use corridor::{Corridor, Direction, SlotGuard};
pub use crosser::Crosser;
pub use monitor::Monitor;
pub use supervisor::Supervisor;
