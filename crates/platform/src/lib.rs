//! Hardware Abstraction Layer (HAL) for the I2S/PCM audio engine
//!
//! This crate provides trait-based abstractions for every collaborator the
//! streaming engine drives, enabling development and testing without
//! physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Streaming engine (i2s-audio crate)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! SoC register blocks, DMA controller, clock manager, GPIO
//! ```
//!
//! # Abstractions
//!
//! - [`pcm`] - PCM/I2S register block and the peripheral-bus access guard
//! - [`gpio`] - Pin function multiplexing
//! - [`clock`] - Fractional clock generator feeding the bit clock
//! - [`dma`] - DMA buffer controller and its completion-callback contract
//! - [`audio`] - Sample source/sink fed from completion callbacks
//! - [`registry`] - Logical device-name directory
//! - [`audio_types`] - Validated domain newtypes
//!
//! The I2C control bus and the microsecond delay are taken straight from
//! `embedded-hal` 1.0 (`I2c`, `DelayNs`).
//!
//! # Features
//!
//! - `std`: Compile the recording mocks in [`mocks`] (for testing)
//! - `defmt`: Enable defmt logging derives
//!
//! # Example
//!
//! ```no_run
//! use platform::{PcmRegister, PcmRegisters};
//!
//! fn enabled<R: PcmRegisters>(regs: &mut R) -> bool {
//!     regs.read(PcmRegister::ControlStatus) & 1 != 0
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors: callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod audio;
pub mod audio_types;
pub mod clock;
pub mod config;
pub mod dma;
pub mod gpio;
pub mod pcm;
pub mod registry;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

// Re-export main traits
pub use audio::{ChunkStream, SampleFormat};
pub use audio_types::{ChunkSize, ChunkSizeError, CodecAddress, OutOfRangeError, SampleRateHz};
pub use clock::{ClockDivisor, ClockGenerator};
pub use dma::{CompletionHandler, Direction, DmaController, TransferOutcome};
pub use gpio::{PinFunction, PinMux};
pub use pcm::{PcmRegister, PcmRegisters, PeripheralBus};
pub use registry::DeviceRegistry;
