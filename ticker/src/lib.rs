//! # ustick
//!
//! A 32-bit, monotonically increasing microsecond clock with one-shot
//! deadline delivery, built on a free-running 16-bit hardware timer with a
//! single compare channel. The clock wraps silently after `2^32`
//! microseconds (about 71.6 minutes); callers are expected to compare
//! timestamps with unsigned modular arithmetic.
//!
//! ## Module Overview
//! - [`calibrate`] – Prescaler and ticks-per-microsecond derivation.
//! - [`clock`]     – The ticker state object and the overflow-race-safe
//!                   time read.
//! - `deadline`    – Arming and canceling one-shot deadlines across
//!                   multiple hardware cycles.
//! - `dispatch`    – The hardware event handler driving the high word and
//!                   deadline delivery.
//!
//! The hardware boundary lives in `ustick-hal`; the test suite drives the
//! core against the `ustick-sim` register model.

pub mod calibrate;
pub mod clock;
mod deadline;
mod dispatch;

pub use calibrate::{Calibration, CalibrationError};
pub use clock::UsTicker;

#[cfg(test)]
mod tests;
