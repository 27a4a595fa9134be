//! Type system enforcement tests for the engine configuration newtypes.
//! These newtypes reject configurations the PCM block cannot run before any
//! register is touched.

#![allow(clippy::unwrap_used)]

// ── SampleRateHz ─────────────────────────────────────────────────────────────

#[test]
fn sample_rate_accepts_common_rates() {
    use platform::SampleRateHz;
    for hz in [8_000, 44_100, 48_000, 96_000, 192_000] {
        assert_eq!(SampleRateHz::new(hz).map(SampleRateHz::get), Ok(hz));
    }
}

#[test]
fn sample_rate_rejects_zero() {
    use platform::SampleRateHz;
    let err = SampleRateHz::new(0).unwrap_err();
    assert_eq!(err.value, 0);
    assert_eq!(err.min, SampleRateHz::MIN_HZ);
}

#[test]
fn sample_rate_is_transparent_u32() {
    use platform::SampleRateHz;
    assert_eq!(core::mem::size_of::<SampleRateHz>(), 4);
}

// ── ChunkSize ────────────────────────────────────────────────────────────────

#[test]
fn chunk_size_minimum_is_accepted() {
    use platform::ChunkSize;
    assert_eq!(ChunkSize::new(ChunkSize::MIN).map(ChunkSize::get), Ok(32));
}

#[test]
fn chunk_size_below_minimum_is_rejected() {
    use platform::{ChunkSize, ChunkSizeError};
    assert_eq!(ChunkSize::new(0), Err(ChunkSizeError::TooSmall(0)));
    assert_eq!(ChunkSize::new(31), Err(ChunkSizeError::TooSmall(31)));
}

#[test]
fn chunk_size_must_hold_whole_frames() {
    use platform::{ChunkSize, ChunkSizeError};
    assert_eq!(ChunkSize::new(65), Err(ChunkSizeError::Odd(65)));
    assert_eq!(ChunkSize::new(64).map(ChunkSize::frames), Ok(32));
}

#[test]
fn chunk_size_errors_render_readably() {
    use platform::ChunkSizeError;
    assert_eq!(
        ChunkSizeError::TooSmall(16).to_string(),
        "chunk of 16 slots is below the minimum of 32"
    );
}

// ── CodecAddress ─────────────────────────────────────────────────────────────

#[test]
fn codec_address_zero_probes() {
    use platform::CodecAddress;
    assert_eq!(CodecAddress::from(0u8), CodecAddress::Probe);
}

#[test]
fn codec_address_nonzero_is_fixed() {
    use platform::CodecAddress;
    assert_eq!(CodecAddress::from(0x1Au8), CodecAddress::Fixed(0x1A));
    assert_eq!(CodecAddress::from(0x4Du8), CodecAddress::Fixed(0x4D));
}
