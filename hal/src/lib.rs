//! Hardware abstraction traits for the microsecond ticker
//!
//! This crate defines the vendor-agnostic boundary between the ticker core
//! and the hardware it runs on: a 16-bit free-running timer register block,
//! an interrupt-controller registration primitive, and a peripheral clock
//! gate. Implementations exist for real register blocks on target hardware
//! and for the simulated timer used by the host test suite.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod clock;
pub mod interrupt;
pub mod timer;

pub use clock::ClockGate;
pub use interrupt::{EventHandler, IrqController};
pub use timer::TimerRegs;

/// Everything the ticker needs from one hardware timer instance.
///
/// Blanket-implemented for any type providing the three collaborator
/// traits, including `Arc<T>` thanks to the forwarding impls in each
/// trait module.
pub trait TimerPeripheral: TimerRegs + IrqController + ClockGate {}

impl<T: TimerRegs + IrqController + ClockGate> TimerPeripheral for T {}
