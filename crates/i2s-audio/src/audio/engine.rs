//! Streaming orchestrator.
//!
//! [`I2sEngine`] owns the PCM hardware, the DMA controller and the optional
//! codec bus for its whole lifetime, and lends a [`StreamLink`] to the DMA
//! controller as completion handler.
//!
//! # Lifecycle
//!
//! ```text
//! new()    clock divisor + start (master), register bring-up, pins, name
//!   │
//!   ▼
//! Armed ──start()──► CodecInitialized ──► Streaming ──cancel()──► Canceling
//!   ▲                       ▲                                        │
//!   │                       └──────────── DMA drained ◄──────────────┘
//!   │
//! any state ── transport fault / DMA start failure / pinned codec failure ──► Faulted
//!
//! drop()   name withdrawn, block disabled, clock stopped (master), pins → input
//! ```
//!
//! The state is never stored: [`I2sEngine::state`] derives it from the fault
//! latch, the codec flag and the DMA controller. `Faulted` has no exit; the
//! engine must be dropped and rebuilt.
//!
//! # Concurrency
//!
//! All methods run on the control thread. Completion callbacks only see the
//! [`StreamLink`], never the engine.

use core::ops::RangeInclusive;

use embedded_hal::i2c::I2c;
use platform::audio::{SAMPLE_MAX, SAMPLE_MIN};
use platform::config::DEVICE_NAME;
use platform::{
    ChunkSize, ChunkStream, CodecAddress, DeviceRegistry, Direction, DmaController,
    OutOfRangeError, SampleFormat, SampleRateHz,
};
use thiserror_no_std::Error;

use crate::audio::clock_math::{self, ClockError};
use crate::audio::codec::{self, CodecError, CodecStatus, CodecVariant};
use crate::audio::pcm::programmer;
use crate::audio::pins::PcmPinout;
use crate::audio::stream::StreamLink;
use crate::audio::PcmHardware;

// ── Configuration ───────────────────────────────────────────────────────────

/// Which directions the link carries. Fixed for the engine's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceMode {
    /// Playback only.
    TxOnly,
    /// Capture only.
    RxOnly,
    /// Playback and capture.
    Duplex,
}

impl DeviceMode {
    /// Whether the playback direction is used.
    pub const fn transmits(self) -> bool {
        !matches!(self, Self::RxOnly)
    }

    /// Whether the capture direction is used.
    pub const fn receives(self) -> bool {
        !matches!(self, Self::TxOnly)
    }

    /// DMA directions used, transmit first.
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        [
            (self.transmits(), Direction::Transmit),
            (self.receives(), Direction::Receive),
        ]
        .into_iter()
        .filter_map(|(used, direction)| used.then_some(direction))
    }
}

/// Who drives the bit clock and frame sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockRole {
    /// This block generates both from the clock generator.
    #[default]
    Master,
    /// An external device supplies both; the clock generator is left alone.
    Slave,
}

/// Construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineConfig {
    /// Directions carried.
    pub mode: DeviceMode,
    /// Bit-clock ownership.
    pub role: ClockRole,
    /// Slots per DMA completion.
    pub chunk: ChunkSize,
    /// Sample rate. Must lie in 8000–192000 Hz in master role.
    pub sample_rate: SampleRateHz,
    /// Codec control address, or probing.
    pub codec_address: CodecAddress,
    /// Pins carrying the PCM signals.
    pub pinout: PcmPinout,
}

impl EngineConfig {
    /// Master role, probed codec, 40-pin header.
    pub fn new(mode: DeviceMode, chunk: ChunkSize, sample_rate: SampleRateHz) -> Self {
        Self {
            mode,
            role: ClockRole::Master,
            chunk,
            sample_rate,
            codec_address: CodecAddress::Probe,
            pinout: PcmPinout::standard(),
        }
    }

    /// Set the clock role.
    #[must_use]
    pub fn with_role(mut self, role: ClockRole) -> Self {
        self.role = role;
        self
    }

    /// Set the codec address.
    #[must_use]
    pub fn with_codec_address(mut self, address: impl Into<CodecAddress>) -> Self {
        self.codec_address = address.into();
        self
    }

    /// Set the pinout (e.g. [`PcmPinout::legacy_p5`] on early boards).
    #[must_use]
    pub fn with_pinout(mut self, pinout: PcmPinout) -> Self {
        self.pinout = pinout;
        self
    }
}

// ── Errors ──────────────────────────────────────────────────────────────────

/// Construction failure. No hardware has been touched when this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Sample rate outside the divider's range (master role).
    #[error("sample rate: {0}")]
    SampleRate(#[from] OutOfRangeError),
    /// The platform clock cannot produce a bit clock.
    #[error("bit clock: {0}")]
    Clock(#[from] ClockError),
}

/// [`I2sEngine::start`] failure. Every variant leaves the engine faulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartError {
    /// A previous failure latched the engine; drop and rebuild it.
    #[error("engine is faulted")]
    Faulted,
    /// The codec at a pinned address did not accept its register table.
    #[error("{variant:?} codec at {address:#04x} did not respond")]
    Codec {
        /// Family expected at the address.
        variant: CodecVariant,
        /// Pinned address.
        address: u8,
    },
    /// The DMA controller could not start a direction.
    #[error("DMA {0:?} pipeline failed to start")]
    Dma(Direction),
}

// ── State ───────────────────────────────────────────────────────────────────

/// Observable engine state, derived on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineState {
    /// Block enabled and pins claimed; codec bring-up has not run.
    Armed,
    /// Codec bring-up has run (it never runs again); no direction active.
    CodecInitialized,
    /// At least one direction is moving samples.
    Streaming,
    /// Cancel requested; a direction is still draining.
    Canceling,
    /// Terminal. Only dropping the engine leaves this state.
    Faulted,
}

// ── Engine ──────────────────────────────────────────────────────────────────

/// I2S streaming engine.
///
/// - `H`: PCM block, pin mux, clock generator, delay ([`PcmHardware`])
/// - `D`: DMA buffer controller holding `&'a` [`StreamLink`] registrations
/// - `I`: codec control bus (optional at run time)
/// - `G`: device-name directory
/// - `S`: sample source/sink behind the link
pub struct I2sEngine<'a, H, D, I, G, S>
where
    H: PcmHardware,
    D: DmaController<'a>,
    I: I2c,
    G: DeviceRegistry,
    S: ChunkStream,
{
    config: EngineConfig,
    hw: H,
    dma: D,
    i2c: Option<I>,
    registry: G,
    link: &'a StreamLink<S>,
    codec: Option<CodecStatus>,
    cancel_requested: bool,
}

impl<'a, H, D, I, G, S> I2sEngine<'a, H, D, I, G, S>
where
    H: PcmHardware,
    D: DmaController<'a>,
    I: I2c,
    G: DeviceRegistry,
    S: ChunkStream,
{
    /// Start the bit clock (master role), bring the PCM block up, claim the
    /// pins and advertise the device.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when the rate is out of range in master role or the
    /// platform clock cannot be divided. Nothing is touched in that case.
    pub fn new(
        config: EngineConfig,
        mut hw: H,
        dma: D,
        i2c: Option<I>,
        mut registry: G,
        link: &'a StreamLink<S>,
    ) -> Result<Self, ConfigError> {
        if config.role == ClockRole::Master {
            let rate = SampleRateHz::new(config.sample_rate.get())?;
            let source_hz = hw.source_hz();
            let divisor = clock_math::divisor_for(source_hz, rate)?;
            info!(
                "clock: {} Hz source, divisor {} + {}/4096",
                source_hz,
                divisor.integer,
                divisor.fraction
            );
            hw.start(divisor);
        }

        programmer::bring_up(&mut hw, config.mode, config.role, config.pinout);
        registry.add_device(DEVICE_NAME);

        info!(
            "engine: {:?} {:?}, {} Hz, {} slots per chunk",
            config.mode,
            config.role,
            config.sample_rate.get(),
            config.chunk.get()
        );

        Ok(Self {
            config,
            hw,
            dma,
            i2c,
            registry,
            link,
            codec: None,
            cancel_requested: false,
        })
    }

    /// Configure the codec (first call only) and start streaming.
    ///
    /// Order: codec bring-up, DREQ levels and DMA enable, DMA start per
    /// direction, then TXON/RXON. The serial engine is only switched on once
    /// every DMA direction runs.
    ///
    /// Transitions:
    /// - `Armed / CodecInitialized → Streaming`  ✓
    /// - `Faulted → Faulted`  returns `Err(Faulted)`, no hardware access
    ///
    /// # Errors
    ///
    /// Any error latches the engine. A DMA failure leaves directions that
    /// already started running; dropping the engine stops the hardware.
    pub fn start(&mut self) -> Result<(), StartError> {
        if self.link.is_faulted() {
            return Err(StartError::Faulted);
        }

        let mode = self.config.mode;

        if mode.transmits() && self.codec.is_none() {
            if let Some(i2c) = self.i2c.as_mut() {
                match codec::bring_up(i2c, self.config.codec_address) {
                    Ok(status) => self.codec = Some(status),
                    Err(CodecError::Unresponsive {
                        variant, address, ..
                    }) => {
                        self.link.trip();
                        return Err(StartError::Codec { variant, address });
                    }
                }
            }
        }

        programmer::arm_dma(&mut self.hw, mode, self.config.chunk);

        for direction in mode.directions() {
            if self.dma.start(direction, self.link).is_err() {
                warn!("dma: {:?} start failed, engine latched", direction);
                self.link.trip();
                return Err(StartError::Dma(direction));
            }
        }

        programmer::enable_streams(&mut self.hw, mode);
        self.cancel_requested = false;

        debug!("engine: streaming");
        Ok(())
    }

    /// Ask every used direction to stop after its buffer in flight.
    ///
    /// Does not wait; poll [`is_active`](Self::is_active).
    pub fn cancel(&mut self) {
        for direction in self.config.mode.directions() {
            self.dma.cancel(direction);
        }
        self.cancel_requested = true;
        debug!("engine: cancel requested");
    }

    /// Whether any used direction is still running.
    pub fn is_active(&self) -> bool {
        self.config
            .mode
            .directions()
            .any(|direction| self.dma.is_active(direction))
    }

    /// Whether the fault latch is set.
    pub fn is_faulted(&self) -> bool {
        self.link.is_faulted()
    }

    /// Current state.
    pub fn state(&self) -> EngineState {
        if self.link.is_faulted() {
            EngineState::Faulted
        } else if self.is_active() {
            if self.cancel_requested {
                EngineState::Canceling
            } else {
                EngineState::Streaming
            }
        } else if self.codec.is_some() {
            EngineState::CodecInitialized
        } else {
            EngineState::Armed
        }
    }

    /// Codec bring-up outcome; `None` until it has run (it never runs in
    /// capture-only mode or without a control bus).
    pub fn codec_status(&self) -> Option<CodecStatus> {
        self.codec
    }

    /// Layout of every slot.
    pub fn sample_format(&self) -> SampleFormat {
        SampleFormat::Signed24In32
    }

    /// Sample values the link carries.
    pub fn sample_range(&self) -> RangeInclusive<i32> {
        SAMPLE_MIN..=SAMPLE_MAX
    }

    /// Construction parameters.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The completion link shared with the DMA controller.
    pub fn link(&self) -> &'a StreamLink<S> {
        self.link
    }
}

impl<'a, H, D, I, G, S> Drop for I2sEngine<'a, H, D, I, G, S>
where
    H: PcmHardware,
    D: DmaController<'a>,
    I: I2c,
    G: DeviceRegistry,
    S: ChunkStream,
{
    /// Stop the hardware now, active or not. An in-flight DMA buffer may be
    /// abandoned.
    fn drop(&mut self) {
        self.registry.remove_device(DEVICE_NAME);
        programmer::teardown(
            &mut self.hw,
            self.config.mode,
            self.config.role,
            self.config.pinout,
        );
        info!("engine: stopped");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use platform::mocks::{MockDma, MockI2c, MockPcmHardware, MockRegistry, RecordingStream};

    fn config(mode: DeviceMode) -> EngineConfig {
        EngineConfig::new(
            mode,
            ChunkSize::new(64).unwrap(),
            SampleRateHz::new(48_000).unwrap(),
        )
    }

    #[test]
    fn mode_direction_sets() {
        let tx: Vec<_> = DeviceMode::TxOnly.directions().collect();
        let rx: Vec<_> = DeviceMode::RxOnly.directions().collect();
        let both: Vec<_> = DeviceMode::Duplex.directions().collect();
        assert_eq!(tx, vec![Direction::Transmit]);
        assert_eq!(rx, vec![Direction::Receive]);
        assert_eq!(both, vec![Direction::Transmit, Direction::Receive]);
    }

    #[test]
    fn builder_overrides_defaults() {
        let cfg = config(DeviceMode::TxOnly)
            .with_role(ClockRole::Slave)
            .with_codec_address(0x4Du8)
            .with_pinout(PcmPinout::legacy_p5());
        assert_eq!(cfg.role, ClockRole::Slave);
        assert_eq!(cfg.codec_address, CodecAddress::Fixed(0x4D));
        assert_eq!(cfg.pinout.base, 28);
    }

    #[test]
    fn new_engine_is_armed() {
        let link = StreamLink::new(RecordingStream::new(0));
        let mut registry = MockRegistry::default();
        let engine = I2sEngine::new(
            config(DeviceMode::Duplex),
            MockPcmHardware::default(),
            MockDma::new(64),
            None::<MockI2c>,
            &mut registry,
            &link,
        )
        .unwrap();
        assert_eq!(engine.state(), EngineState::Armed);
        assert!(!engine.is_active());
        assert_eq!(engine.codec_status(), None);
    }

    #[test]
    fn sample_range_is_symmetric_24_bit() {
        let link = StreamLink::new(RecordingStream::new(0));
        let engine = I2sEngine::new(
            config(DeviceMode::TxOnly),
            MockPcmHardware::default(),
            MockDma::new(64),
            None::<MockI2c>,
            MockRegistry::default(),
            &link,
        )
        .unwrap();
        assert_eq!(engine.sample_range(), -8_388_607..=8_388_607);
        assert_eq!(engine.sample_format(), SampleFormat::Signed24In32);
    }

    #[test]
    fn start_then_cancel_walks_the_states() {
        let link = StreamLink::new(RecordingStream::new(0));
        let dma = MockDma::new(64);
        let mut engine = I2sEngine::new(
            config(DeviceMode::TxOnly),
            MockPcmHardware::default(),
            dma.clone(),
            Some(MockI2c::new()),
            MockRegistry::default(),
            &link,
        )
        .unwrap();

        engine.start().unwrap();
        assert_eq!(engine.state(), EngineState::Streaming);

        engine.cancel();
        assert_eq!(engine.state(), EngineState::Canceling);

        dma.complete(Direction::Transmit);
        assert_eq!(engine.state(), EngineState::CodecInitialized);
    }

    #[test]
    fn transport_fault_is_terminal() {
        let link = StreamLink::new(RecordingStream::new(0));
        let dma = MockDma::new(64);
        let mut engine = I2sEngine::new(
            config(DeviceMode::RxOnly),
            MockPcmHardware::default(),
            dma.clone(),
            None::<MockI2c>,
            MockRegistry::default(),
            &link,
        )
        .unwrap();

        engine.start().unwrap();
        dma.fail_transfer(Direction::Receive);
        assert_eq!(engine.state(), EngineState::Faulted);
        assert_eq!(engine.start(), Err(StartError::Faulted));
    }
}
