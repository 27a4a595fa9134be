//! Reference sample source/sink.
//!
//! Two fixed-capacity rings of 32-bit slots, one per direction, each behind a
//! critical-section mutex so the control thread and DMA-completion context can
//! both touch them. Frames are pushed and popped as left/right pairs. `N` must
//! be even, and capture keeps or drops whole frames, so a ring never holds
//! half a frame.
//!
//! - Playback underrun: `fill_chunk` returns what it had (a short chunk).
//! - Capture overrun: the newest frames are dropped and their slots counted.
//!
//! An odd capacity is rejected at compile time:
//!
//! ```compile_fail
//! let queue = i2s_audio::SampleQueue::<5>::new();
//! ```

use core::cell::RefCell;
use core::sync::atomic::{AtomicUsize, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Deque;
use platform::audio::{SAMPLE_MAX, SAMPLE_MIN};
use platform::ChunkStream;

type Ring<const N: usize> = Mutex<CriticalSectionRawMutex, RefCell<Deque<u32, N>>>;

/// Ring-buffered [`ChunkStream`] holding up to `N` slots (`N / 2` frames)
/// per direction.
pub struct SampleQueue<const N: usize> {
    playback: Ring<N>,
    capture: Ring<N>,
    underruns: AtomicUsize,
    dropped: AtomicUsize,
}

// Slots carry two's-complement samples; the casts reinterpret, they do not convert.
#[allow(clippy::cast_sign_loss)]
fn to_slot(sample: i32) -> u32 {
    sample.clamp(SAMPLE_MIN, SAMPLE_MAX) as u32
}

#[allow(clippy::cast_possible_wrap)]
fn from_slot(slot: u32) -> i32 {
    slot as i32
}

impl<const N: usize> SampleQueue<N> {
    const WHOLE_FRAMES: () = assert!(N % 2 == 0, "SampleQueue capacity must be even");

    /// Empty queue.
    pub const fn new() -> Self {
        let () = Self::WHOLE_FRAMES;
        Self {
            playback: Mutex::const_new(CriticalSectionRawMutex::new(), RefCell::new(Deque::new())),
            capture: Mutex::const_new(CriticalSectionRawMutex::new(), RefCell::new(Deque::new())),
            underruns: AtomicUsize::new(0),
            dropped: AtomicUsize::new(0),
        }
    }

    /// Queue one playback frame. Samples are clamped to the 24-bit range.
    ///
    /// Returns `false` (and queues nothing) when the ring cannot take both
    /// channels.
    pub fn push_frame(&self, left: i32, right: i32) -> bool {
        self.playback.lock(|ring| {
            let mut ring = ring.borrow_mut();
            if N.saturating_sub(ring.len()) < 2 {
                return false;
            }
            ring.push_back(to_slot(left)).is_ok() && ring.push_back(to_slot(right)).is_ok()
        })
    }

    /// Queue as many `frames` as fit; returns the number queued.
    pub fn push_frames(&self, frames: &[(i32, i32)]) -> usize {
        frames
            .iter()
            .take_while(|(left, right)| self.push_frame(*left, *right))
            .count()
    }

    /// Take the oldest captured frame.
    pub fn pop_frame(&self) -> Option<(i32, i32)> {
        self.capture.lock(|ring| {
            let mut ring = ring.borrow_mut();
            if ring.len() < 2 {
                return None;
            }
            let left = ring.pop_front()?;
            let right = ring.pop_front()?;
            Some((from_slot(left), from_slot(right)))
        })
    }

    /// Slots waiting to be played.
    pub fn playback_len(&self) -> usize {
        self.playback.lock(|ring| ring.borrow().len())
    }

    /// Captured slots waiting to be read.
    pub fn capture_len(&self) -> usize {
        self.capture.lock(|ring| ring.borrow().len())
    }

    /// Number of chunks that could not be filled completely.
    pub fn underruns(&self) -> usize {
        self.underruns.load(Ordering::Relaxed)
    }

    /// Captured slots discarded because the ring was full.
    pub fn dropped_slots(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<const N: usize> Default for SampleQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ChunkStream for SampleQueue<N> {
    fn fill_chunk(&self, buffer: &mut [u32]) -> usize {
        let produced = self.playback.lock(|ring| {
            let mut ring = ring.borrow_mut();
            let mut produced = 0usize;
            for slot in buffer.iter_mut() {
                match ring.pop_front() {
                    Some(sample) => {
                        *slot = sample;
                        produced = produced.saturating_add(1);
                    }
                    None => break,
                }
            }
            produced
        });
        if produced < buffer.len() {
            self.underruns.fetch_add(1, Ordering::Relaxed);
        }
        produced
    }

    fn consume_chunk(&self, buffer: &[u32]) {
        let frames = buffer.chunks_exact(2);
        let trailing = frames.remainder().len();
        let dropped = self.capture.lock(|ring| {
            let mut ring = ring.borrow_mut();
            let mut dropped = trailing;
            for frame in frames {
                if let [left, right] = *frame {
                    if N.saturating_sub(ring.len()) >= 2
                        && ring.push_back(left).is_ok()
                        && ring.push_back(right).is_ok()
                    {
                        continue;
                    }
                }
                dropped = dropped.saturating_add(2);
            }
            dropped
        });
        if dropped > 0 {
            self.dropped.fetch_add(dropped, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_come_out_interleaved() {
        let queue: SampleQueue<8> = SampleQueue::new();
        assert!(queue.push_frame(1, -1));
        assert!(queue.push_frame(2, -2));
        let mut buffer = [0u32; 4];
        assert_eq!(queue.fill_chunk(&mut buffer), 4);
        assert_eq!(buffer, [1, u32::MAX, 2, u32::MAX - 1]);
        assert_eq!(queue.underruns(), 0);
    }

    #[test]
    fn samples_are_clamped_to_24_bits() {
        let queue: SampleQueue<4> = SampleQueue::new();
        assert!(queue.push_frame(i32::MAX, i32::MIN));
        let mut buffer = [0u32; 2];
        queue.fill_chunk(&mut buffer);
        assert_eq!(buffer, [to_slot(SAMPLE_MAX), to_slot(SAMPLE_MIN)]);
    }

    /// Underrun yields a short chunk, not an error.
    #[test]
    fn underrun_returns_short_chunk() {
        let queue: SampleQueue<8> = SampleQueue::new();
        queue.push_frame(5, 6);
        let mut buffer = [0u32; 8];
        assert_eq!(queue.fill_chunk(&mut buffer), 2);
        assert_eq!(queue.underruns(), 1);
    }

    #[test]
    fn full_ring_refuses_whole_frame() {
        let queue: SampleQueue<4> = SampleQueue::new();
        assert_eq!(queue.push_frames(&[(1, 1), (2, 2), (3, 3)]), 2);
        assert_eq!(queue.playback_len(), 4);
    }

    #[test]
    fn capture_round_trips_signed_samples() {
        let queue: SampleQueue<8> = SampleQueue::new();
        queue.consume_chunk(&[to_slot(-100), to_slot(200)]);
        assert_eq!(queue.pop_frame(), Some((-100, 200)));
        assert_eq!(queue.pop_frame(), None);
    }

    #[test]
    fn capture_overflow_drops_and_counts() {
        let queue: SampleQueue<4> = SampleQueue::new();
        queue.consume_chunk(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(queue.capture_len(), 4);
        assert_eq!(queue.dropped_slots(), 2);
    }

    /// Channels stay paired after the ring has overflowed and drained.
    #[test]
    fn overflow_keeps_left_right_pairing() {
        let queue: SampleQueue<4> = SampleQueue::new();
        let slots = |frames: &[(i32, i32)]| -> Vec<u32> {
            frames
                .iter()
                .flat_map(|(left, right)| [to_slot(*left), to_slot(*right)])
                .collect()
        };

        queue.consume_chunk(&slots(&[(1, -1), (2, -2), (3, -3)]));
        assert_eq!(queue.pop_frame(), Some((1, -1)));
        assert_eq!(queue.pop_frame(), Some((2, -2)));

        queue.consume_chunk(&slots(&[(4, -4)]));
        assert_eq!(queue.pop_frame(), Some((4, -4)));
        assert_eq!(queue.pop_frame(), None);
    }

    /// A trailing half frame is discarded rather than paired with the next chunk.
    #[test]
    fn odd_chunk_drops_trailing_slot() {
        let queue: SampleQueue<8> = SampleQueue::new();
        queue.consume_chunk(&[to_slot(7), to_slot(-7), to_slot(9)]);
        assert_eq!(queue.capture_len(), 2);
        assert_eq!(queue.dropped_slots(), 1);

        queue.consume_chunk(&[to_slot(8), to_slot(-8)]);
        assert_eq!(queue.pop_frame(), Some((7, -7)));
        assert_eq!(queue.pop_frame(), Some((8, -8)));
    }
}
