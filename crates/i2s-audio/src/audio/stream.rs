//! State shared between the control thread and DMA-completion context.
//!
//! The DMA controller keeps a `&dyn CompletionHandler` to a [`StreamLink`] for
//! as long as a sub-pipeline runs. That reference is a non-owning
//! back-reference: the engine borrows the link for its whole lifetime, so the
//! link outlives every registration.
//!
//! Only two things cross the context boundary:
//!
//! - the [`FaultLatch`], set from completion context, read by the control
//!   thread (one-way, so a race between the TX and RX handlers is benign)
//! - the [`ChunkStream`], which owns its own synchronisation

use core::sync::atomic::{AtomicBool, Ordering};

use platform::{ChunkStream, CompletionHandler, Direction, TransferOutcome};

/// Sticky fault flag.
///
/// Never cleared; a faulted engine must be dropped and rebuilt.
#[derive(Debug, Default)]
pub struct FaultLatch(AtomicBool);

impl FaultLatch {
    /// A clear latch.
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Set the latch. Idempotent.
    pub fn trip(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether the latch has been set.
    pub fn is_tripped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Completion handler connecting the DMA controller to a sample stream.
///
/// Construct once (typically in a `static` or on the caller's stack) and lend
/// it to [`I2sEngine::new`](crate::audio::engine::I2sEngine::new).
#[derive(Debug)]
pub struct StreamLink<S> {
    fault: FaultLatch,
    stream: S,
}

impl<S: ChunkStream> StreamLink<S> {
    /// Wrap `stream`.
    pub const fn new(stream: S) -> Self {
        Self {
            fault: FaultLatch::new(),
            stream,
        }
    }

    /// The sample stream.
    pub fn stream(&self) -> &S {
        &self.stream
    }

    /// Whether any completion has reported a transport fault.
    pub fn is_faulted(&self) -> bool {
        self.fault.is_tripped()
    }

    pub(crate) fn trip(&self) {
        self.fault.trip();
    }

    /// Playback completion: refill `buffer` from the stream.
    ///
    /// Returns the slots produced; fewer than the buffer length ends the
    /// stream. A transport fault trips the latch and returns 0 without
    /// touching any buffer.
    pub fn tx_completed(&self, outcome: TransferOutcome<'_>) -> usize {
        match outcome {
            TransferOutcome::Completed(buffer) => {
                let requested = buffer.len();
                let produced = self.stream.fill_chunk(buffer);
                if produced < requested {
                    trace!("tx: short chunk {} of {} slots", produced, requested);
                }
                produced
            }
            TransferOutcome::Failed => {
                self.fault.trip();
                warn!("tx: transfer fault, engine latched");
                0
            }
        }
    }

    /// Capture completion: hand `buffer` to the stream. Always returns 0.
    pub fn rx_completed(&self, outcome: TransferOutcome<'_>) -> usize {
        match outcome {
            TransferOutcome::Completed(buffer) => {
                trace!("rx: {} slots captured", buffer.len());
                self.stream.consume_chunk(buffer);
            }
            TransferOutcome::Failed => {
                self.fault.trip();
                warn!("rx: transfer fault, engine latched");
            }
        }
        0
    }
}

impl<S: ChunkStream> CompletionHandler for StreamLink<S> {
    fn on_complete(&self, direction: Direction, outcome: TransferOutcome<'_>) -> usize {
        match direction {
            Direction::Transmit => self.tx_completed(outcome),
            Direction::Receive => self.rx_completed(outcome),
        }
    }
}
