//! Deadline arming and cancellation.
//!
//! A deadline further away than one hardware cycle cannot be expressed in
//! the 16-bit compare register directly. `arm` splits the distance into
//! whole overflow cycles plus a final compare value and stores that pair;
//! the event handler then walks the intermediate compare events until the
//! terminal one delivers the hook.

use std::sync::atomic::Ordering;

use ustick_hal::TimerPeripheral;

use crate::clock::UsTicker;

/// Bias added to a near-wraparound remainder so the first compare event
/// always lands strictly inside the upcoming cycle.
pub(crate) const HALF_CYCLE: u16 = 0x8000;

impl<P: TimerPeripheral> UsTicker<P> {
    /// Schedule hook delivery at the absolute microsecond timestamp
    /// `target_us`. A target at or before the current time delivers the
    /// hook synchronously before returning. Re-arming replaces any
    /// pending deadline; only the latest one ever delivers.
    ///
    /// Compare-match delivery is kept disabled while the pending state is
    /// updated, so the handler can never observe a half-written pair.
    pub fn arm(&self, target_us: u32) {
        self.periph.disable_match_irq();

        let delta = target_us.wrapping_sub(self.read_time()) as i32;
        if delta <= 0 {
            log::trace!("deadline {target_us}us already due, delivering inline");
            (self.hook)();
            return;
        }

        let divisor = self.divisor();
        let delta_ticks = (delta as u32).wrapping_mul(divisor);
        let target_ticks = target_us.wrapping_mul(divisor);

        let cycles = (delta_ticks >> 16) as u16;
        let remainder = target_ticks as u16;

        // A small low half means the compare value sits close ahead of the
        // counter; an overflow racing the write below could step past it
        // and delay delivery by a whole cycle. Detour via an extra compare
        // half a cycle out, and let the handler program the true remainder
        // from a safe distance. This assumes a full cycle always outlasts
        // the handler's reprogramming latency, which must hold on the
        // target hardware.
        if (delta_ticks & 0xFFFF) < u32::from(HALF_CYCLE) && cycles > 0 {
            self.periph.set_compare(remainder.wrapping_add(HALF_CYCLE));
            self.cycles.store(cycles - 1, Ordering::SeqCst);
            self.bias_rem.store(remainder, Ordering::SeqCst);
            self.bias_pending.store(true, Ordering::SeqCst);
        } else {
            self.periph.set_compare(remainder);
            self.cycles.store(cycles, Ordering::SeqCst);
            self.bias_rem.store(0, Ordering::SeqCst);
            self.bias_pending.store(false, Ordering::SeqCst);
        }
        log::trace!("deadline armed for {target_us}us ({delta}us out)");

        self.periph.clear_match_flag();
        self.periph.enable_match_irq();
    }

    /// Suppress delivery of the pending deadline. Takes effect
    /// immediately; a compare event already latched in hardware is
    /// tolerated by the handler as a no-op.
    pub fn cancel(&self) {
        self.periph.disable_match_irq();
        log::trace!("deadline canceled");
    }

    /// Clear a latched compare-match condition without touching the
    /// delivery enables.
    pub fn clear_match(&self) {
        self.periph.clear_match_flag();
    }
}
