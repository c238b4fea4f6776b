//! Peripheral clock domain abstraction

use alloc::sync::Arc;

/// Clock gate for the timer's clock domain.
pub trait ClockGate: Send + Sync {
    /// Enable the peripheral clock. Idempotent.
    fn enable(&self);

    /// Input clock frequency of the timer in Hz, before prescaling.
    fn frequency_hz(&self) -> u32;
}

impl<T: ClockGate + ?Sized> ClockGate for Arc<T> {
    fn enable(&self) {
        (**self).enable()
    }

    fn frequency_hz(&self) -> u32 {
        (**self).frequency_hz()
    }
}
