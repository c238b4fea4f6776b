//! Prescaler and divisor derivation for the timer input clock.

use core::fmt;

use thiserror::Error;

/// Largest prescaler exponent the hardware accepts (DIV1024).
pub const MAX_PRESCALER: u8 = 10;

/// Result of calibrating the timer against its input clock.
///
/// The counter must tick at an integer multiple of 1 MHz so that the
/// microsecond conversion stays exact integer arithmetic. Calibration
/// picks the largest power-of-two prescaler that preserves that property,
/// maximizing the counter range before overflow. Examples:
/// 14 MHz => prescaler 1 (DIV2), 7 ticks/us;
/// 24 MHz => prescaler 3 (DIV8), 3 ticks/us;
/// 48 MHz => prescaler 4 (DIV16), 3 ticks/us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    prescaler: u8,
    ticks_per_us: u32,
}

/// Configuration-time calibration failure. Not recoverable: without a
/// positive divisor no valid timekeeping is possible.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationError {
    #[error("input clock of {0} Hz cannot produce a positive ticks-per-microsecond divisor")]
    FrequencyTooLow(u32),
}

impl Calibration {
    /// Derive the prescaler exponent and ticks-per-microsecond divisor
    /// from the input clock frequency.
    pub fn try_new(input_hz: u32) -> Result<Self, CalibrationError> {
        let mut ticks_per_us = input_hz / 1_000_000;
        if ticks_per_us == 0 {
            return Err(CalibrationError::FrequencyTooLow(input_hz));
        }

        let mut prescaler = 0u8;
        while ticks_per_us & 1 == 0 && prescaler <= MAX_PRESCALER {
            ticks_per_us >>= 1;
            prescaler += 1;
        }

        Ok(Self {
            prescaler,
            ticks_per_us,
        })
    }

    /// Power-of-two prescaler exponent to program into the hardware.
    pub const fn prescaler(self) -> u8 {
        self.prescaler
    }

    /// Counter ticks per microsecond after prescaling.
    pub const fn ticks_per_us(self) -> u32 {
        self.ticks_per_us
    }
}

impl fmt::Display for Calibration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DIV{} @ {} ticks/us", 1u32 << self.prescaler, self.ticks_per_us)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Calibration {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "DIV{} @ {} ticks/us", 1u32 << self.prescaler, self.ticks_per_us);
    }
}
