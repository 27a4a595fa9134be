//! Property-based tests for the bit-clock divisor.
//! The divisor must be the closest 1/4096 step for every source and rate the
//! clock generator can see, not just the common PLL rates.

// Strategy bounds keep the widened arithmetic far from overflow.
#![allow(clippy::arithmetic_side_effects, clippy::unwrap_used)]

use i2s_audio::audio::clock_math::{bit_clock_hz, divisor_for, ClockError, BITS_PER_FRAME};
use platform::SampleRateHz;

/// Frame-aligned sources from 64 × 192 kHz up to the largest u32 multiple of 64.
fn source_hz(frames: u32) -> u32 {
    frames * BITS_PER_FRAME
}

proptest::proptest! {
    /// The integer part is never zero and the fraction fits 12 bits.
    #[test]
    fn divisor_fields_in_range(
        frames in 192_000u32..=(u32::MAX / 64),
        hz in 8_000u32..=192_000u32,
    ) {
        let divisor = divisor_for(source_hz(frames), SampleRateHz::new(hz).unwrap()).unwrap();
        assert!(divisor.integer >= 1);
        assert!(divisor.fraction <= 4095, "fraction {} overflows 12 bits", divisor.fraction);
    }

    /// (DIVI + DIVF/4096) is within half a step of F / (64 × fs).
    #[test]
    fn divisor_is_nearest_step(
        frames in 192_000u32..=(u32::MAX / 64),
        hz in 8_000u32..=192_000u32,
    ) {
        let divisor = divisor_for(source_hz(frames), SampleRateHz::new(hz).unwrap()).unwrap();
        let steps = i128::from(divisor.integer) * 4096 + i128::from(divisor.fraction);
        let error = (steps * i128::from(hz) - i128::from(frames) * 4096).abs();
        assert!(
            error * 2 <= i128::from(hz),
            "{} Hz source, {} Hz: {} + {}/4096 is {} / {} off",
            source_hz(frames), hz, divisor.integer, divisor.fraction, error, hz
        );
    }

    /// The resulting bit clock stays within 0.1 % of 64 × fs.
    #[test]
    fn bit_clock_tracks_rate(frames in 192_000u32..=(u32::MAX / 64), hz in 8_000u32..=192_000u32) {
        let source = source_hz(frames);
        let divisor = divisor_for(source, SampleRateHz::new(hz).unwrap()).unwrap();
        let target = u64::from(hz) * u64::from(BITS_PER_FRAME);
        let actual = u64::from(bit_clock_hz(source, divisor));
        assert!(actual.abs_diff(target) * 1000 <= target, "{} Hz vs {} Hz", actual, target);
    }

    /// Sources that are not a multiple of the frame width are refused.
    #[test]
    fn unaligned_sources_rejected(frames in 192_000u32..(u32::MAX / 64), offset in 1u32..64u32) {
        let source = source_hz(frames) + offset;
        assert_eq!(
            divisor_for(source, SampleRateHz::new(48_000).unwrap()),
            Err(ClockError::SourceNotFrameAligned(source))
        );
    }
}
