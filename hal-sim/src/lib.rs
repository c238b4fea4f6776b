//! Simulated 16-bit timer peripheral.
//!
//! `SimTimer` models the register block the ticker core runs against on
//! real hardware: a free-running 16-bit counter with a programmable top,
//! one compare channel, latched overflow and compare-match conditions,
//! and per-condition delivery enables. Time is advanced explicitly with
//! [`SimTimer::step`], which walks the counter in event-sized segments so
//! that every wrap and every compare crossing latches its condition in
//! order, no matter how large the step.
//!
//! The interrupt mask ([`SimTimer::mask_irqs`]) latches conditions without
//! delivering them, reproducing the windows that exist on hardware while
//! execution sits inside the event handler or a masked foreground section.

use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, AtomicU8, Ordering};
use std::sync::Mutex;

use ustick_hal::{ClockGate, EventHandler, IrqController, TimerRegs};

/// Host-side model of one hardware timer instance.
pub struct SimTimer {
    frequency_hz: AtomicU32,
    counter: AtomicU16,
    compare: AtomicU16,
    top: AtomicU16,
    prescaler: AtomicU8,
    running: AtomicBool,
    clock_on: AtomicBool,
    overflow_flag: AtomicBool,
    match_flag: AtomicBool,
    overflow_irq_en: AtomicBool,
    match_irq_en: AtomicBool,
    irq_en: AtomicBool,
    masked: AtomicBool,
    handler: Mutex<Option<EventHandler>>,
}

impl SimTimer {
    /// Create a stopped timer clocked at `frequency_hz`.
    pub fn new(frequency_hz: u32) -> Self {
        Self {
            frequency_hz: AtomicU32::new(frequency_hz),
            counter: AtomicU16::new(0),
            compare: AtomicU16::new(0),
            top: AtomicU16::new(u16::MAX),
            prescaler: AtomicU8::new(0),
            running: AtomicBool::new(false),
            clock_on: AtomicBool::new(false),
            overflow_flag: AtomicBool::new(false),
            match_flag: AtomicBool::new(false),
            overflow_irq_en: AtomicBool::new(false),
            match_irq_en: AtomicBool::new(false),
            irq_en: AtomicBool::new(false),
            masked: AtomicBool::new(false),
            handler: Mutex::new(None),
        }
    }

    /// Advance the counter by `ticks` (already prescaled) counter ticks.
    ///
    /// Conditions latch exactly where they would on hardware; the bound
    /// handler runs after each segment unless delivery is masked or
    /// disabled.
    pub fn step(&self, mut ticks: u32) {
        if !self.running.load(Ordering::SeqCst) {
            return;
        }
        while ticks > 0 {
            let cnt = u32::from(self.counter.load(Ordering::SeqCst));
            let period = u32::from(self.top.load(Ordering::SeqCst)) + 1;
            let wrap_in = period - cnt;
            let compare = u32::from(self.compare.load(Ordering::SeqCst));
            let mut match_in = (compare + period - cnt) % period;
            if match_in == 0 {
                // Counter already sits on the compare value: the next match
                // is a full cycle away.
                match_in = period;
            }
            let n = ticks.min(wrap_in).min(match_in);
            let next = cnt + n;
            if next >= period {
                self.counter.store((next - period) as u16, Ordering::SeqCst);
                self.overflow_flag.store(true, Ordering::SeqCst);
                log::trace!("sim: overflow latched");
            } else {
                self.counter.store(next as u16, Ordering::SeqCst);
            }
            if n == match_in {
                self.match_flag.store(true, Ordering::SeqCst);
                log::trace!("sim: compare match latched at {:#06x}", compare);
            }
            ticks -= n;
            self.deliver();
        }
    }

    /// Suppress event delivery while still latching conditions, as if the
    /// processor were executing with interrupts disabled.
    pub fn mask_irqs(&self) {
        self.masked.store(true, Ordering::SeqCst);
    }

    /// Re-enable delivery and immediately deliver anything still latched.
    pub fn unmask_irqs(&self) {
        self.masked.store(false, Ordering::SeqCst);
        self.deliver();
    }

    /// Programmed prescaler exponent.
    pub fn prescaler(&self) -> u8 {
        self.prescaler.load(Ordering::SeqCst)
    }

    /// Programmed compare value.
    pub fn compare(&self) -> u16 {
        self.compare.load(Ordering::SeqCst)
    }

    /// Whether the peripheral clock has been gated on.
    pub fn clock_enabled(&self) -> bool {
        self.clock_on.load(Ordering::SeqCst)
    }

    /// Whether the counter is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn pending(&self) -> bool {
        let overflow = self.overflow_flag.load(Ordering::SeqCst)
            && self.overflow_irq_en.load(Ordering::SeqCst);
        let compare =
            self.match_flag.load(Ordering::SeqCst) && self.match_irq_en.load(Ordering::SeqCst);
        overflow || compare
    }

    fn deliver(&self) {
        if self.masked.load(Ordering::SeqCst) || !self.irq_en.load(Ordering::SeqCst) {
            return;
        }
        if self.pending() {
            // Clone the handler out of the slot so the lock is not held
            // while the handler touches the registers.
            let handler = self.handler.lock().unwrap().clone();
            if let Some(handler) = handler {
                handler();
            }
        }
    }
}

impl TimerRegs for SimTimer {
    fn counter(&self) -> u16 {
        self.counter.load(Ordering::SeqCst)
    }

    fn set_counter(&self, ticks: u16) {
        self.counter.store(ticks, Ordering::SeqCst);
    }

    fn set_compare(&self, ticks: u16) {
        self.compare.store(ticks, Ordering::SeqCst);
    }

    fn set_top(&self, ticks: u16) {
        self.top.store(ticks, Ordering::SeqCst);
    }

    fn set_prescaler(&self, exponent: u8) {
        self.prescaler.store(exponent, Ordering::SeqCst);
    }

    fn overflow_flag(&self) -> bool {
        self.overflow_flag.load(Ordering::SeqCst)
    }

    fn clear_overflow_flag(&self) {
        self.overflow_flag.store(false, Ordering::SeqCst);
    }

    fn match_flag(&self) -> bool {
        self.match_flag.load(Ordering::SeqCst)
    }

    fn clear_match_flag(&self) {
        self.match_flag.store(false, Ordering::SeqCst);
    }

    fn enable_overflow_irq(&self) {
        self.overflow_irq_en.store(true, Ordering::SeqCst);
    }

    fn enable_match_irq(&self) {
        self.match_irq_en.store(true, Ordering::SeqCst);
    }

    fn disable_match_irq(&self) {
        self.match_irq_en.store(false, Ordering::SeqCst);
    }

    fn match_irq_enabled(&self) -> bool {
        self.match_irq_en.load(Ordering::SeqCst)
    }

    fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
    }
}

impl IrqController for SimTimer {
    fn bind(&self, handler: EventHandler) {
        *self.handler.lock().unwrap() = Some(handler);
    }

    fn enable_irq(&self) {
        self.irq_en.store(true, Ordering::SeqCst);
        self.deliver();
    }
}

impl ClockGate for SimTimer {
    fn enable(&self) {
        self.clock_on.store(true, Ordering::SeqCst);
    }

    fn frequency_hz(&self) -> u32 {
        self.frequency_hz.load(Ordering::SeqCst)
    }
}
