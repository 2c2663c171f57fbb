//! Error types for the simulation runtime.
//!
//! Every failure here is terminal: there are no retries anywhere in the
//! system. [`SimError::Overload`] and [`SimError::PileUp`] are the two
//! alarm-class outcomes that abort the whole run; [`SimError::Internal`]
//! covers failures of the underlying synchronization primitives, which
//! should never happen in a healthy process.

use thiserror::Error;

/// Exit status reported when the run is aborted by an alarm-class error.
pub const ABNORMAL_EXIT: u8 = 2;

/// Terminal errors produced by the simulation.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SimError {
    /// A monitor observed more concurrent crossings than the threshold allows.
    ///
    /// The sum is read from the two directional counters, not from the
    /// occupancy semaphore, so it can only exceed the threshold when the
    /// threshold is configured below the corridor capacity (or when the
    /// crossing protocol is broken).
    #[error(
        "corridor overloaded: {total} crossing (forward={forward}, backward={backward}), threshold {threshold}"
    )]
    Overload {
        /// Crossers observed mid-transit in the forward direction.
        forward: u32,
        /// Crossers observed mid-transit in the backward direction.
        backward: u32,
        /// Sum of the two directional counters at observation time.
        total: u32,
        /// Configured crossing threshold that was exceeded.
        threshold: u32,
    },

    /// Opposing traffic was observed while the one-way policy is active.
    ///
    /// Raised by the crosser that entered second; carries both directional
    /// counts for diagnosis.
    #[error("pile-up in the corridor: forward={forward}, backward={backward} under one-way policy")]
    PileUp {
        /// Crossers claiming the forward direction.
        forward: u32,
        /// Crossers claiming the backward direction.
        backward: u32,
    },

    /// An underlying synchronization primitive failed.
    ///
    /// Closed semaphore or poisoned counter lock. The actor that hits this
    /// terminates instead of looping on in a possibly inconsistent state.
    #[error("synchronization primitive failure: {error}")]
    Internal {
        /// Description of the failed primitive operation.
        error: String,
    },
}

impl SimError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            SimError::Overload { .. } => "corridor_overload",
            SimError::PileUp { .. } => "corridor_pile_up",
            SimError::Internal { .. } => "internal_failure",
        }
    }

    /// Maps the error to the process exit status.
    ///
    /// Alarm-class outcomes (overload, pile-up) share the distinguished
    /// abnormal code; primitive failures exit with a generic failure code.
    pub fn exit_code(&self) -> u8 {
        match self {
            SimError::Overload { .. } | SimError::PileUp { .. } => ABNORMAL_EXIT,
            SimError::Internal { .. } => 1,
        }
    }

    /// True for the alarm-class outcomes that are part of the simulation's
    /// intended behavior (as opposed to primitive failures).
    pub fn is_alarm(&self) -> bool {
        matches!(self, SimError::Overload { .. } | SimError::PileUp { .. })
    }
}
