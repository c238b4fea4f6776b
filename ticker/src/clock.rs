//! Extended monotonic counter.
//!
//! The hardware counts 16 bits; the upper 16 bits of the logical tick
//! count live in software and advance once per hardware overflow. Reads
//! combine the two halves with a double-read protocol so a value composed
//! from different overflow epochs is never returned.

use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, Ordering};
use std::sync::Arc;

use ustick_hal::TimerPeripheral;

use crate::calibrate::Calibration;

/// Top value programmed into the counter: use the full 16-bit range.
pub(crate) const COUNTER_TOP: u16 = 0xFFFF;

/// Microsecond ticker over one hardware timer instance.
///
/// One ticker owns the whole clock: all counter and deadline state lives
/// in this single object for the lifetime of the process. The high word
/// and the pending-deadline fields are written by the event handler and
/// read from foreground without locks; [`UsTicker::read_time`] re-validates
/// around possible intervening events instead.
pub struct UsTicker<P: TimerPeripheral> {
    pub(crate) periph: P,
    /// Completed overflow cycles of the hardware counter.
    pub(crate) high: AtomicU16,
    /// Whole 65536-tick cycles left before the armed deadline is due.
    pub(crate) cycles: AtomicU16,
    /// Final compare value still to be programmed when the half-cycle
    /// bias was applied.
    pub(crate) bias_rem: AtomicU16,
    /// Whether the half-cycle bias hop is still ahead. Kept as its own
    /// flag because a final compare value of exactly zero is legal and
    /// must still take the hop.
    pub(crate) bias_pending: AtomicBool,
    /// Counter ticks per microsecond, fixed by `init`.
    divisor: AtomicU32,
    inited: AtomicBool,
    pub(crate) hook: Box<dyn Fn() + Send + Sync>,
}

impl<P: TimerPeripheral> UsTicker<P> {
    /// Create the ticker for `periph`, with `hook` as the deadline
    /// callback. The hook is invoked at most once per [`UsTicker::arm`].
    ///
    /// The hardware is not touched until [`UsTicker::init`] (or the first
    /// time read) runs.
    pub fn new(periph: P, hook: impl Fn() + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            periph,
            high: AtomicU16::new(0),
            cycles: AtomicU16::new(0),
            bias_rem: AtomicU16::new(0),
            bias_pending: AtomicBool::new(false),
            divisor: AtomicU32::new(1),
            inited: AtomicBool::new(false),
            hook: Box::new(hook),
        })
    }

    /// One-time calibration and hardware start. Idempotent: repeat calls
    /// are no-ops.
    ///
    /// # Panics
    ///
    /// Aborts if the input clock cannot produce a positive
    /// ticks-per-microsecond divisor; no valid timekeeping is possible on
    /// such a clock.
    pub fn init(&self) {
        if self.inited.swap(true, Ordering::SeqCst) {
            return;
        }

        self.periph.enable();
        self.periph.set_counter(0);

        let calibration = Calibration::try_new(self.periph.frequency_hz())
            .expect("timer input clock must be at least 1 MHz");
        self.periph.set_prescaler(calibration.prescaler());
        self.divisor.store(calibration.ticks_per_us(), Ordering::SeqCst);
        log::debug!(
            "ticker calibrated: {} from {} Hz",
            calibration,
            self.periph.frequency_hz()
        );

        self.periph.set_top(COUNTER_TOP);
        self.periph.enable_overflow_irq();
        self.periph.start();
    }

    /// Current time in microseconds. Wraps at `2^32` microseconds.
    ///
    /// Callable from foreground or from within the event handler; never
    /// blocks. The result is monotonically non-decreasing modulo the wrap.
    pub fn read_time(&self) -> u32 {
        if !self.inited.load(Ordering::SeqCst) {
            self.init();
        }

        // A latched overflow whose event has not been delivered yet (for
        // example while this runs inside the compare-match branch of the
        // handler) is accounted for here so the handler does not count it
        // again later.
        if self.periph.overflow_flag() {
            self.high.fetch_add(1, Ordering::SeqCst);
            self.periph.clear_overflow_flag();
        }

        // Read the high word on both sides of the low word and retry on a
        // mismatch, so an overflow in between can never produce a composite
        // of halves from different epochs.
        loop {
            let mut high_before = self.high.load(Ordering::SeqCst);
            if self.periph.overflow_flag() {
                high_before = high_before.wrapping_add(1);
            }
            let low = self.periph.counter();
            let mut high_after = self.high.load(Ordering::SeqCst);
            if self.periph.overflow_flag() {
                high_after = high_after.wrapping_add(1);
            }
            if high_before == high_after {
                let ticks = (u32::from(high_after) << 16) | u32::from(low);
                return ticks / self.divisor.load(Ordering::Relaxed);
            }
        }
    }

    /// Ticks per microsecond after prescaling.
    pub(crate) fn divisor(&self) -> u32 {
        self.divisor.load(Ordering::Relaxed)
    }
}
