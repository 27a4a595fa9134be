//! Audio domain newtypes for compile-time safety.
//!
//! These zero-cost abstractions prevent common errors:
//! - `SampleRateHz`: validates 8000–192000 Hz (the range the bit-clock
//!   divider is defined for)
//! - `ChunkSize`: even and at least 32 slots per DMA completion
//! - `CodecAddress`: distinguishes "probe" from a pinned control-bus address

use thiserror_no_std::Error;

// ── Error types ──────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("value {value} outside {min}..={max}")]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: u32,
    /// The inclusive minimum allowed value.
    pub min: u32,
    /// The inclusive maximum allowed value.
    pub max: u32,
}

/// Error returned by [`ChunkSize::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChunkSizeError {
    /// Fewer than [`ChunkSize::MIN`] slots.
    #[error("chunk of {0} slots is below the minimum of 32")]
    TooSmall(usize),
    /// Odd slot count; a chunk must hold whole left/right frames.
    #[error("chunk of {0} slots is not a whole number of stereo frames")]
    Odd(usize),
}

// ── SampleRateHz ─────────────────────────────────────────────────────────────

/// Sample rate in Hz, validated to the range the bit-clock divider supports.
///
/// Valid range: 8000–192000 Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct SampleRateHz(u32);

impl SampleRateHz {
    /// Minimum supported sample rate: 8000 Hz (telephony).
    pub const MIN_HZ: u32 = 8_000;

    /// Maximum supported sample rate: 192000 Hz.
    pub const MAX_HZ: u32 = 192_000;

    /// Create a `SampleRateHz`, returning an error if out of 8000–192000 Hz.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `hz < 8000` or `hz > 192000`.
    pub fn new(hz: u32) -> Result<Self, OutOfRangeError> {
        if (Self::MIN_HZ..=Self::MAX_HZ).contains(&hz) {
            Ok(Self(hz))
        } else {
            Err(OutOfRangeError {
                value: hz,
                min: Self::MIN_HZ,
                max: Self::MAX_HZ,
            })
        }
    }

    /// Record a rate dictated by an external clock master.
    ///
    /// No divisor is derived from it, so no range applies.
    #[must_use]
    pub const fn external(hz: u32) -> Self {
        Self(hz)
    }

    /// Return the sample rate in Hz.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

// ── ChunkSize ────────────────────────────────────────────────────────────────

/// Number of 32-bit slots moved per DMA completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct ChunkSize(usize);

impl ChunkSize {
    /// Smallest chunk the FIFO thresholds are tuned for.
    pub const MIN: usize = 32;

    /// Validate a chunk size.
    ///
    /// # Errors
    ///
    /// [`ChunkSizeError::TooSmall`] below 32 slots, [`ChunkSizeError::Odd`]
    /// for odd slot counts.
    pub fn new(slots: usize) -> Result<Self, ChunkSizeError> {
        if slots < Self::MIN {
            Err(ChunkSizeError::TooSmall(slots))
        } else if slots % 2 != 0 {
            Err(ChunkSizeError::Odd(slots))
        } else {
            Ok(Self(slots))
        }
    }

    /// Return the slot count.
    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }

    /// Number of stereo frames in the chunk.
    #[must_use]
    pub fn frames(self) -> usize {
        self.0 / 2
    }
}

// ── CodecAddress ─────────────────────────────────────────────────────────────

/// 7-bit control-bus address of the external codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecAddress {
    /// Try the known candidate addresses in order; absence is not an error.
    #[default]
    Probe,
    /// Use exactly this address; an unresponsive codec is fatal.
    Fixed(u8),
}

impl From<u8> for CodecAddress {
    /// `0` selects probing, any other value pins the address.
    fn from(addr: u8) -> Self {
        if addr == 0 {
            Self::Probe
        } else {
            Self::Fixed(addr)
        }
    }
}
