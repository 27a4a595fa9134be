//! Sample source/sink abstraction

/// Sample layout carried in every 32-bit slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleFormat {
    /// Signed 24-bit sample, right-justified in a 32-bit slot.
    Signed24In32,
}

impl SampleFormat {
    /// Smallest sample value the format carries.
    pub const fn min_value(self) -> i32 {
        match self {
            Self::Signed24In32 => SAMPLE_MIN,
        }
    }

    /// Largest sample value the format carries.
    pub const fn max_value(self) -> i32 {
        match self {
            Self::Signed24In32 => SAMPLE_MAX,
        }
    }
}

/// Smallest 24-bit sample (kept symmetric with [`SAMPLE_MAX`]).
pub const SAMPLE_MIN: i32 = -(1 << 23) + 1;

/// Largest 24-bit sample.
pub const SAMPLE_MAX: i32 = (1 << 23) - 1;

/// Source of playback chunks and sink of capture chunks.
///
/// Both methods are called synchronously from DMA-completion context and must
/// not block. They take `&self`: the implementation owns its concurrency
/// discipline (a transmit fill may run concurrently with a receive consume).
pub trait ChunkStream: Sync {
    /// Fill `buffer` with interleaved left/right slots.
    ///
    /// Returns the number of slots written; fewer than `buffer.len()` marks a
    /// short, final chunk.
    fn fill_chunk(&self, buffer: &mut [u32]) -> usize;

    /// Take a captured chunk of interleaved left/right slots.
    fn consume_chunk(&self, buffer: &[u32]);
}
