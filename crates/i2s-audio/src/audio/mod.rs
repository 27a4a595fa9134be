//! Audio subsystem: PCM peripheral, codec and streaming orchestration
//!
//! Vertically sliced: one sub-module per concern.
//!
//! # Structure
//!
//! - `clock_math`: bit-clock divisor from the PLL rate and sample rate
//! - `pcm/`: register map and the bring-up / teardown programmer
//! - `pins`: PCM pin routing per board model
//! - `codec/`: I2C codec bring-up (PCM51xx, WM8960) and address probing
//! - `stream`: state shared with DMA-completion context
//! - `engine`: the orchestrator ([`engine::I2sEngine`])
//! - `sample_queue`: reference ring-buffered sample source/sink
//!
//! # Dependency Injection
//!
//! The engine targets the platform traits; concrete types are injected at the
//! call site:
//!
//! ```rust,ignore
//! // Hardware:
//! I2sEngine::new(config, Bcm2711Pcm::take(), dma, Some(i2c), &mut names, &link)?;
//! // Tests:
//! I2sEngine::new(config, MockPcmHardware::default(), dma, None::<MockI2c>, &mut registry, &link)?;
//! ```

pub mod clock_math;
pub mod codec;
pub mod engine;
pub mod pcm;
pub mod pins;
pub mod sample_queue;
pub mod stream;

use embedded_hal::delay::DelayNs;
use platform::{ClockGenerator, PcmRegisters, PeripheralBus, PinMux};

/// Everything the engine drives on the SoC side: the PCM register block, the
/// bus-access guard, the pin multiplexer, the bit-clock generator and a
/// microsecond delay source.
///
/// Blanket-implemented; platforms implement the five component traits.
pub trait PcmHardware: PcmRegisters + PeripheralBus + PinMux + ClockGenerator + DelayNs {}

impl<T> PcmHardware for T where
    T: PcmRegisters + PeripheralBus + PinMux + ClockGenerator + DelayNs
{
}
