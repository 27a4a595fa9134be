//! DMA buffer controller abstraction
//!
//! The controller owns a pair of sample buffers per direction and ping-pongs
//! between them. Every time a buffer finishes it calls the registered
//! [`CompletionHandler`] from the DMA-completion interrupt, lending the buffer
//! that must be refilled (transmit) or drained (receive) before the next swap.
//!
//! # Callback contract
//!
//! - Completions for one direction are strictly sequential; transmit and
//!   receive completions may interleave with each other and with thread mode.
//! - The handler must return promptly and never block.
//! - The buffer is only valid for the duration of the call.
//! - A handler return value smaller than the buffer length marks a short
//!   (final) chunk, not an error.
//! - [`TransferOutcome::Failed`] reports a transport fault. No buffer is lent
//!   in that case, so a handler cannot touch it.

/// Transfer direction of a DMA sub-pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Memory → PCM TX FIFO (playback).
    Transmit,
    /// PCM RX FIFO → memory (capture).
    Receive,
}

/// Result of one completed buffer transfer, handed to the completion handler.
#[derive(Debug)]
pub enum TransferOutcome<'b> {
    /// The transfer finished; the buffer (interleaved 32-bit two-channel
    /// slots) is lent to the handler until it returns.
    Completed(&'b mut [u32]),
    /// The controller detected a transport fault.
    Failed,
}

/// Receiver of DMA completion events.
///
/// Invoked from interrupt context, hence the `Sync` bound.
pub trait CompletionHandler: Sync {
    /// Handle one completion for `direction`.
    ///
    /// Returns the number of 32-bit slots produced into the buffer (transmit)
    /// or 0 (receive, or on failure).
    fn on_complete(&self, direction: Direction, outcome: TransferOutcome<'_>) -> usize;
}

/// DMA buffer-pair controller for the PCM FIFO.
///
/// `'h` is the lifetime of the handler registered by [`start`](Self::start).
/// The controller keeps the reference only while the sub-pipeline is active;
/// it is a non-owning back-reference to the engine's shared state.
pub trait DmaController<'h> {
    /// Error type (typically descriptor or channel exhaustion)
    type Error: core::fmt::Debug;

    /// Start streaming in `direction`, delivering completions to `handler`.
    fn start(
        &mut self,
        direction: Direction,
        handler: &'h dyn CompletionHandler,
    ) -> Result<(), Self::Error>;

    /// Request a graceful stop after the buffer in flight. Does not block.
    fn cancel(&mut self, direction: Direction);

    /// Whether the `direction` sub-pipeline is still running.
    fn is_active(&self, direction: Direction) -> bool;
}
