//! Fractional clock generator abstraction.
//!
//! In master role the PCM bit clock comes from a general-purpose clock
//! generator fed by a fixed PLL. The generator divides the PLL by an integer
//! plus a 12-bit fraction (MASH-1 noise shaping when the fraction is nonzero).
//!
//! ```text
//! PLL source (F) ──► integer + fraction/4096 divider ──► PCM_CLK = 64 × fs
//! ```

/// Scale of the fractional divisor field (12 bits).
pub const FRACTION_SCALE: u32 = 4096;

/// Largest representable fraction.
pub const FRACTION_MAX: u16 = 4095;

/// Integer + fractional divisor pair for the clock generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockDivisor {
    /// Integer part (DIVI).
    pub integer: u32,
    /// Fractional part in 1/4096 steps (DIVF, 0..=4095).
    pub fraction: u16,
}

impl ClockDivisor {
    /// Whether the generator must run its fractional (MASH) stage.
    pub fn fractional_enabled(self) -> bool {
        self.fraction > 0
    }
}

/// Clock generator driving the PCM bit clock.
pub trait ClockGenerator {
    /// Frequency of the PLL feeding the generator, in Hz.
    fn source_hz(&self) -> u32;

    /// Start the generator with the given divisor.
    ///
    /// The fractional stage is enabled iff [`ClockDivisor::fractional_enabled`].
    fn start(&mut self, divisor: ClockDivisor);

    /// Stop the generator.
    fn stop(&mut self);
}
