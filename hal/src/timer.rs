//! Timer peripheral register abstraction

use alloc::sync::Arc;

/// Register-level view of a free-running 16-bit timer with one compare
/// channel, an overflow condition and a compare-match condition.
///
/// All operations are plain register accesses: they never fail and never
/// block. Methods take `&self` because hardware registers are shared,
/// interior-mutable cells; implementations must make each individual
/// access atomic with respect to the event handler.
pub trait TimerRegs: Send + Sync {
    /// Read the current counter value.
    fn counter(&self) -> u16;

    /// Write the counter value.
    fn set_counter(&self, ticks: u16);

    /// Program the compare channel. The match condition latches when the
    /// counter reaches this value.
    fn set_compare(&self, ticks: u16);

    /// Program the top (wrap) value of the counter.
    fn set_top(&self, ticks: u16);

    /// Program the power-of-two prescaler: the counter advances once every
    /// `2^exponent` input clocks.
    fn set_prescaler(&self, exponent: u8);

    /// Whether the overflow condition is latched. Reading does not clear.
    fn overflow_flag(&self) -> bool;

    /// Clear the latched overflow condition.
    fn clear_overflow_flag(&self);

    /// Whether the compare-match condition is latched. Reading does not clear.
    fn match_flag(&self) -> bool;

    /// Clear the latched compare-match condition.
    fn clear_match_flag(&self);

    /// Enable event delivery for the overflow condition.
    fn enable_overflow_irq(&self);

    /// Enable event delivery for the compare-match condition.
    fn enable_match_irq(&self);

    /// Disable event delivery for the compare-match condition. A condition
    /// already latched in hardware stays latched but is no longer delivered.
    fn disable_match_irq(&self);

    /// Whether compare-match delivery is currently enabled.
    fn match_irq_enabled(&self) -> bool;

    /// Start the counter.
    fn start(&self);
}

impl<T: TimerRegs + ?Sized> TimerRegs for Arc<T> {
    fn counter(&self) -> u16 {
        (**self).counter()
    }

    fn set_counter(&self, ticks: u16) {
        (**self).set_counter(ticks)
    }

    fn set_compare(&self, ticks: u16) {
        (**self).set_compare(ticks)
    }

    fn set_top(&self, ticks: u16) {
        (**self).set_top(ticks)
    }

    fn set_prescaler(&self, exponent: u8) {
        (**self).set_prescaler(exponent)
    }

    fn overflow_flag(&self) -> bool {
        (**self).overflow_flag()
    }

    fn clear_overflow_flag(&self) {
        (**self).clear_overflow_flag()
    }

    fn match_flag(&self) -> bool {
        (**self).match_flag()
    }

    fn clear_match_flag(&self) {
        (**self).clear_match_flag()
    }

    fn enable_overflow_irq(&self) {
        (**self).enable_overflow_irq()
    }

    fn enable_match_irq(&self) {
        (**self).enable_match_irq()
    }

    fn disable_match_irq(&self) {
        (**self).disable_match_irq()
    }

    fn match_irq_enabled(&self) -> bool {
        (**self).match_irq_enabled()
    }

    fn start(&self) {
        (**self).start()
    }
}
