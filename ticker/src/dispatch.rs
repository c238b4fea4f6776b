//! Hardware event handler.
//!
//! Runs to completion on every recognized timer event and is never
//! preempted by itself. It is the only writer of the high word on the
//! event path and the consumer of the pending-deadline pair stored by
//! `arm`.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use ustick_hal::TimerPeripheral;

use crate::clock::UsTicker;

impl<P: TimerPeripheral + 'static> UsTicker<P> {
    /// Bind [`UsTicker::on_event`] into the interrupt controller and
    /// enable delivery.
    pub fn install(self: &Arc<Self>) {
        let this = Arc::clone(self);
        self.periph.bind(Arc::new(move || this.on_event()));
        self.periph.enable_irq();
    }
}

impl<P: TimerPeripheral> UsTicker<P> {
    /// Handle a hardware timer event: compare match first, then overflow.
    ///
    /// A compare match observed while compare-match delivery is disabled
    /// is a stale event from before a `cancel` and is left alone.
    pub fn on_event(&self) {
        if self.periph.match_flag() && self.periph.match_irq_enabled() {
            if self.bias_pending.swap(false, Ordering::SeqCst) {
                // Half-cycle detour done; aim at the true remainder.
                self.periph.set_compare(self.bias_rem.swap(0, Ordering::SeqCst));
                self.periph.clear_match_flag();
            } else {
                let cycles = self.cycles.load(Ordering::SeqCst);
                if cycles > 0 {
                    self.cycles.store(cycles - 1, Ordering::SeqCst);
                    self.periph.clear_match_flag();
                } else {
                    // Terminal match: the deadline is due.
                    self.periph.clear_match_flag();
                    self.periph.disable_match_irq();
                    log::trace!("deadline delivered");
                    (self.hook)();
                }
            }
        }

        if self.periph.overflow_flag() {
            self.high.fetch_add(1, Ordering::SeqCst);
            self.periph.clear_overflow_flag();
        }
    }
}
