//! Bit-clock divisor calculation for the PCM clock generator.
//!
//! In master role the PCM bit clock is produced by a fractional clock
//! generator fed from the PLLD source. One frame is two 32-bit slots, so the
//! bit clock must run at 64 × fs.
//!
//! # Formula
//!
//!   B     = F / 64                 (F = PLL rate, exact by platform invariant)
//!   DivI  = B / fs
//!   R     = B mod fs
//!   DivF  = round(R × 4096 / fs)   = (R × 4096 + fs/2) / fs
//!
//! If rounding yields 4096 the fraction carries into the integer part.
//!
//! # Worked example
//!
//!   F = 19 200 000 Hz (crystal), fs = 44 100 Hz
//!   B = 300 000,  DivI = 6,  R = 35 400
//!   DivF = (35 400 × 4096 + 22 050) / 44 100 = 3288
//!
//! The generator then runs its MASH-1 stage because DivF > 0.

use platform::clock::{FRACTION_MAX, FRACTION_SCALE};
use platform::{ClockDivisor, SampleRateHz};
use thiserror_no_std::Error;

/// Channels per frame.
pub const CHANNELS: u32 = 2;

/// Bits per channel slot.
pub const SLOT_BITS: u32 = 32;

/// Bit clocks per frame (`CHANNELS × SLOT_BITS`).
pub const BITS_PER_FRAME: u32 = 64;

/// Divisor calculation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// The clock source reports 0 Hz.
    #[error("clock source reports 0 Hz")]
    ZeroSource,
    /// The clock source is not a whole multiple of the frame width.
    #[error("clock source {0} Hz is not a multiple of 64")]
    SourceNotFrameAligned(u32),
    /// A sample rate of 0 Hz was requested.
    #[error("sample rate of 0 Hz")]
    ZeroRate,
}

/// Compute the clock-generator divisor producing a 64 × `rate` bit clock from
/// a `source_hz` reference.
///
/// # Errors
///
/// [`ClockError::ZeroSource`] / [`ClockError::SourceNotFrameAligned`] when the
/// platform clock violates its invariant, [`ClockError::ZeroRate`] for a zero
/// rate.
pub fn divisor_for(source_hz: u32, rate: SampleRateHz) -> Result<ClockDivisor, ClockError> {
    if source_hz == 0 {
        return Err(ClockError::ZeroSource);
    }
    if source_hz % BITS_PER_FRAME != 0 {
        return Err(ClockError::SourceNotFrameAligned(source_hz));
    }

    let base = source_hz / BITS_PER_FRAME;
    let fs = rate.get();
    let integer = base.checked_div(fs).ok_or(ClockError::ZeroRate)?;
    let remainder = base.checked_rem(fs).ok_or(ClockError::ZeroRate)?;

    // remainder < fs, so the numerator stays below 2^45.
    #[allow(clippy::arithmetic_side_effects)]
    let fraction = (u64::from(remainder) * u64::from(FRACTION_SCALE) + u64::from(fs) / 2)
        / u64::from(fs);

    match u16::try_from(fraction) {
        Ok(fraction) if fraction <= FRACTION_MAX => Ok(ClockDivisor { integer, fraction }),
        // Rounded up to a whole step: carry.
        _ => Ok(ClockDivisor {
            integer: integer.saturating_add(1),
            fraction: 0,
        }),
    }
}

/// Bit clock (Hz) the generator produces from `source_hz` with `divisor`.
///
/// Inverse of [`divisor_for`], for diagnostics. Returns 0 for a zero divisor.
pub fn bit_clock_hz(source_hz: u32, divisor: ClockDivisor) -> u32 {
    let steps = u64::from(divisor.integer)
        .saturating_mul(u64::from(FRACTION_SCALE))
        .saturating_add(u64::from(divisor.fraction));
    let scaled = u64::from(source_hz).saturating_mul(u64::from(FRACTION_SCALE));
    scaled
        .checked_div(steps)
        .and_then(|hz| u32::try_from(hz).ok())
        .unwrap_or(0)
}
