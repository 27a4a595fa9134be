//! Property-based tests for the configuration newtypes.
//! Verifies invariants hold for ALL inputs, not just fixed examples.

// Strategy bounds keep slot arithmetic far from overflow.
#![allow(clippy::arithmetic_side_effects)]

use platform::{ChunkSize, ChunkSizeError, CodecAddress, SampleRateHz};

proptest::proptest! {
    /// SampleRateHz::new never panics for any u32 input.
    #[test]
    fn sample_rate_hz_new_never_panics(hz in 0u32..=u32::MAX) {
        let _ = SampleRateHz::new(hz);
    }

    /// SampleRateHz valid range [8000, 192000] always succeeds and round-trips.
    #[test]
    fn sample_rate_hz_valid_range_always_ok(hz in 8_000u32..=192_000u32) {
        assert_eq!(SampleRateHz::new(hz).map(SampleRateHz::get), Ok(hz),
            "SampleRateHz::new({}) should be Ok within [8000, 192000]", hz);
    }

    /// SampleRateHz above the divider range always fails.
    #[test]
    fn sample_rate_hz_above_range_always_err(hz in 192_001u32..=u32::MAX) {
        assert!(SampleRateHz::new(hz).is_err(),
            "SampleRateHz::new({}) should be Err above 192000", hz);
    }

    /// Every even count from 32 up is a valid chunk of count/2 frames.
    #[test]
    fn chunk_size_even_counts_accepted(half in 16usize..=4096usize) {
        let slots = half * 2;
        let chunk = ChunkSize::new(slots);
        assert_eq!(chunk.map(ChunkSize::frames), Ok(half));
    }

    /// Odd counts are never accepted.
    #[test]
    fn chunk_size_odd_counts_rejected(half in 16usize..=4096usize) {
        let slots = half * 2 + 1;
        assert_eq!(ChunkSize::new(slots), Err(ChunkSizeError::Odd(slots)));
    }

    /// Only zero selects probing.
    #[test]
    fn codec_address_only_zero_probes(addr in 1u8..=u8::MAX) {
        assert_eq!(CodecAddress::from(addr), CodecAddress::Fixed(addr));
    }
}
