//! I2S/PCM Audio Streaming Engine
//!
//! Drives the SoC's PCM serial-audio peripheral as an I2S link: computes the
//! bit-clock divisor, programs the peripheral registers, configures an
//! external codec over I2C, and feeds the DMA buffer controller from a
//! sample source/sink in completion-callback context.
//!
//! # Architecture
//!
//! ```text
//! Caller (sound device, tests)
//!         ↓
//! I2sEngine (audio::engine) ──► StreamLink (audio::stream) ◄── DMA completions
//!         ↓
//! Register programmer, pins, clock divider, codec bring-up
//!         ↓
//! Platform HAL traits (platform crate)
//! ```
//!
//! # Features
//!
//! - `std` - Enable standard library and the platform recording mocks
//! - `defmt` - Log through defmt (hardware builds)
//! - `tracing` - Log through tracing (host builds)
//!
//! # Examples
//!
//! ## Host tests
//!
//! ```bash
//! cargo test -p i2s-audio --features std
//! ```
//!
//! ## Hardware build
//!
//! ```bash
//! cargo build --release --target aarch64-unknown-none --features defmt
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
// Upgrade relevant warns to deny; keep pedantic as warn
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(unsafe_op_in_unsafe_fn)]
// unsafe fn body is not implicitly unsafe block
// Logging discipline (allow println in tests via clippy.toml)
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)] // common in Rust crates; not a real issue
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

// Must come first: the logging macros are textually scoped.
#[macro_use]
mod log;

pub mod audio;

// Re-export key types
pub use audio::codec::{CodecStatus, CodecVariant};
pub use audio::engine::{
    ClockRole, ConfigError, DeviceMode, EngineConfig, EngineState, I2sEngine, StartError,
};
pub use audio::pins::PcmPinout;
pub use audio::sample_queue::SampleQueue;
pub use audio::stream::StreamLink;
pub use audio::PcmHardware;
