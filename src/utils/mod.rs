//! Shared utilities used across the scheduler and lifecycle modules.

pub mod clock;

pub use clock::{Clock, ManualClock, SystemClock};
