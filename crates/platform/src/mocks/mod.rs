//! Mock implementations for testing
//!
//! This module provides recording mocks of every platform trait for use in
//! unit and integration tests. Each mock is a cheap handle around shared
//! state, so a test can keep a clone for inspection while the engine owns the
//! other one.

#![cfg(any(test, feature = "std"))]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::vec::Vec;

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

use crate::*;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Hardware (registers, bus guard, pins, clock, delay) ─────────────────────

/// One observable hardware interaction, in call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareEvent {
    /// [`PeripheralBus::enter`]
    BusEnter,
    /// [`PeripheralBus::exit`]
    BusExit,
    /// Register write with the value written
    Write(PcmRegister, u32),
    /// Busy-wait of the given number of microseconds
    DelayUs(u32),
    /// Pin routed to a function
    Pin(u8, PinFunction),
    /// Clock generator started
    ClockStart(ClockDivisor),
    /// Clock generator stopped
    ClockStop,
}

#[derive(Debug, Default)]
struct HardwareState {
    control_status: u32,
    mode: u32,
    rx_config: u32,
    tx_config: u32,
    dma_request: u32,
    bus_depth: usize,
    events: Vec<HardwareEvent>,
}

impl HardwareState {
    fn slot(&mut self, reg: PcmRegister) -> &mut u32 {
        match reg {
            PcmRegister::ControlStatus => &mut self.control_status,
            PcmRegister::Mode => &mut self.mode,
            PcmRegister::RxConfig => &mut self.rx_config,
            PcmRegister::TxConfig => &mut self.tx_config,
            PcmRegister::DmaRequest => &mut self.dma_request,
        }
    }
}

/// Mock PCM peripheral plus its clock generator, pin mux and delay source.
///
/// Registers behave as plain memory; every write, delay, pin change and clock
/// transition is appended to an ordered event log.
#[derive(Debug, Clone)]
pub struct MockPcmHardware {
    source_hz: u32,
    state: Arc<Mutex<HardwareState>>,
}

impl MockPcmHardware {
    /// PLLD rate of BCM2711-based boards (750 MHz).
    pub const PLLD_HZ: u32 = 750_000_000;

    /// Create a mock whose clock generator is fed by `source_hz`.
    pub fn new(source_hz: u32) -> Self {
        Self {
            source_hz,
            state: Arc::new(Mutex::new(HardwareState::default())),
        }
    }

    /// Snapshot of the event log.
    pub fn events(&self) -> Vec<HardwareEvent> {
        lock(&self.state).events.clone()
    }

    /// Number of events recorded so far.
    pub fn event_count(&self) -> usize {
        lock(&self.state).events.len()
    }

    /// Current value of a register.
    pub fn register(&self, reg: PcmRegister) -> u32 {
        *lock(&self.state).slot(reg)
    }

    /// Preload a register (e.g. reset values).
    pub fn set_register(&self, reg: PcmRegister, value: u32) {
        *lock(&self.state).slot(reg) = value;
    }

    /// Whether every [`PeripheralBus::enter`] has been matched by an `exit`.
    pub fn bus_released(&self) -> bool {
        lock(&self.state).bus_depth == 0
    }

    /// Writes to `reg`, in order.
    pub fn writes_to(&self, reg: PcmRegister) -> Vec<u32> {
        lock(&self.state)
            .events
            .iter()
            .filter_map(|event| match event {
                HardwareEvent::Write(r, value) if *r == reg => Some(*value),
                _ => None,
            })
            .collect()
    }

    /// Pins routed to `function`, in order.
    pub fn pins_set_to(&self, function: PinFunction) -> Vec<u8> {
        lock(&self.state)
            .events
            .iter()
            .filter_map(|event| match event {
                HardwareEvent::Pin(pin, f) if *f == function => Some(*pin),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: HardwareEvent) {
        lock(&self.state).events.push(event);
    }
}

impl Default for MockPcmHardware {
    fn default() -> Self {
        Self::new(Self::PLLD_HZ)
    }
}

impl PcmRegisters for MockPcmHardware {
    fn read(&mut self, reg: PcmRegister) -> u32 {
        *lock(&self.state).slot(reg)
    }

    fn write(&mut self, reg: PcmRegister, value: u32) {
        let mut state = lock(&self.state);
        *state.slot(reg) = value;
        state.events.push(HardwareEvent::Write(reg, value));
    }
}

impl PeripheralBus for MockPcmHardware {
    fn enter(&mut self) {
        let mut state = lock(&self.state);
        state.bus_depth = state.bus_depth.saturating_add(1);
        state.events.push(HardwareEvent::BusEnter);
    }

    fn exit(&mut self) {
        let mut state = lock(&self.state);
        state.bus_depth = state.bus_depth.saturating_sub(1);
        state.events.push(HardwareEvent::BusExit);
    }
}

impl PinMux for MockPcmHardware {
    fn set_function(&mut self, pin: u8, function: PinFunction) {
        self.record(HardwareEvent::Pin(pin, function));
    }
}

impl ClockGenerator for MockPcmHardware {
    fn source_hz(&self) -> u32 {
        self.source_hz
    }

    fn start(&mut self, divisor: ClockDivisor) {
        self.record(HardwareEvent::ClockStart(divisor));
    }

    fn stop(&mut self) {
        self.record(HardwareEvent::ClockStop);
    }
}

impl embedded_hal::delay::DelayNs for MockPcmHardware {
    fn delay_ns(&mut self, ns: u32) {
        self.record(HardwareEvent::DelayUs(ns / 1000));
    }

    fn delay_us(&mut self, us: u32) {
        self.record(HardwareEvent::DelayUs(us));
    }
}

// ── DMA buffer controller ───────────────────────────────────────────────────

#[derive(Default)]
struct Lane<'h> {
    handler: Option<&'h dyn CompletionHandler>,
    active: bool,
    cancel_requested: bool,
    refuse: bool,
}

#[derive(Default)]
struct DmaState<'h> {
    transmit: Lane<'h>,
    receive: Lane<'h>,
    starts: Vec<Direction>,
    cancels: Vec<Direction>,
}

impl<'h> DmaState<'h> {
    fn lane(&self, direction: Direction) -> &Lane<'h> {
        match direction {
            Direction::Transmit => &self.transmit,
            Direction::Receive => &self.receive,
        }
    }

    fn lane_mut(&mut self, direction: Direction) -> &mut Lane<'h> {
        match direction {
            Direction::Transmit => &mut self.transmit,
            Direction::Receive => &mut self.receive,
        }
    }
}

/// Error returned by [`MockDma`] when a start was told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockDmaExhausted(pub Direction);

/// Mock DMA buffer controller.
///
/// Completions are driven by the test through [`complete`](Self::complete)
/// and [`fail_transfer`](Self::fail_transfer), which call the handler the
/// engine registered, exactly as the DMA interrupt would.
#[derive(Clone)]
pub struct MockDma<'h> {
    chunk: usize,
    state: Arc<Mutex<DmaState<'h>>>,
}

impl<'h> MockDma<'h> {
    /// Create a controller lending buffers of `chunk` slots.
    pub fn new(chunk: usize) -> Self {
        Self {
            chunk,
            state: Arc::new(Mutex::new(DmaState::default())),
        }
    }

    /// Make the next starts of `direction` fail (descriptor exhaustion).
    pub fn refuse_start(&self, direction: Direction) {
        lock(&self.state).lane_mut(direction).refuse = true;
    }

    /// Directions started, in order.
    pub fn starts(&self) -> Vec<Direction> {
        lock(&self.state).starts.clone()
    }

    /// Directions cancelled, in order.
    pub fn cancels(&self) -> Vec<Direction> {
        lock(&self.state).cancels.clone()
    }

    /// Whether a handler is registered for `direction`.
    pub fn has_handler(&self, direction: Direction) -> bool {
        lock(&self.state).lane(direction).handler.is_some()
    }

    /// Finish one buffer in `direction` with the given contents.
    ///
    /// Returns the handler's result, or `None` if the direction is idle. A
    /// pending cancel takes effect after this buffer.
    pub fn complete_with(&self, direction: Direction, buffer: &mut [u32]) -> Option<usize> {
        let handler = self.take_turn(direction)?;
        Some(handler.on_complete(direction, TransferOutcome::Completed(buffer)))
    }

    /// Finish one zero-filled buffer in `direction`, returning it with the
    /// handler's result.
    pub fn complete(&self, direction: Direction) -> Option<(usize, Vec<u32>)> {
        let mut buffer = vec![0u32; self.chunk];
        let produced = self.complete_with(direction, &mut buffer)?;
        Some((produced, buffer))
    }

    /// Report a transport fault in `direction`.
    pub fn fail_transfer(&self, direction: Direction) -> Option<usize> {
        let handler = self.take_turn(direction)?;
        Some(handler.on_complete(direction, TransferOutcome::Failed))
    }

    fn take_turn(&self, direction: Direction) -> Option<&'h dyn CompletionHandler> {
        let mut state = lock(&self.state);
        let lane = state.lane_mut(direction);
        if !lane.active {
            return None;
        }
        let handler = lane.handler?;
        if lane.cancel_requested {
            *lane = Lane::default();
        }
        Some(handler)
    }
}

impl<'h> DmaController<'h> for MockDma<'h> {
    type Error = MockDmaExhausted;

    fn start(
        &mut self,
        direction: Direction,
        handler: &'h dyn CompletionHandler,
    ) -> Result<(), Self::Error> {
        let mut state = lock(&self.state);
        state.starts.push(direction);
        let lane = state.lane_mut(direction);
        if lane.refuse {
            return Err(MockDmaExhausted(direction));
        }
        lane.handler = Some(handler);
        lane.active = true;
        lane.cancel_requested = false;
        Ok(())
    }

    fn cancel(&mut self, direction: Direction) {
        let mut state = lock(&self.state);
        state.cancels.push(direction);
        let lane = state.lane_mut(direction);
        if lane.active {
            lane.cancel_requested = true;
        }
    }

    fn is_active(&self, direction: Direction) -> bool {
        lock(&self.state).lane(direction).active
    }
}

// ── I2C control bus ─────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct I2cState {
    unresponsive: Vec<u8>,
    writes: Vec<(u8, Vec<u8>)>,
    attempts: Vec<u8>,
}

/// Mock I2C bus. Devices are present at every address except the ones marked
/// unresponsive, which NACK their address byte.
#[derive(Debug, Clone, Default)]
pub struct MockI2c {
    state: Arc<Mutex<I2cState>>,
}

impl MockI2c {
    /// Bus where every address acknowledges.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bus where none of `addresses` acknowledge.
    pub fn without(addresses: &[u8]) -> Self {
        let bus = Self::new();
        lock(&bus.state).unresponsive.extend_from_slice(addresses);
        bus
    }

    /// Successful writes as (address, bytes), in order.
    pub fn writes(&self) -> Vec<(u8, Vec<u8>)> {
        lock(&self.state).writes.clone()
    }

    /// Every addressed transaction, successful or not, in order.
    pub fn attempts(&self) -> Vec<u8> {
        lock(&self.state).attempts.clone()
    }
}

impl ErrorType for MockI2c {
    type Error = ErrorKind;
}

impl I2c for MockI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut state = lock(&self.state);
        state.attempts.push(address);
        if state.unresponsive.contains(&address) {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for op in operations.iter() {
            if let Operation::Write(bytes) = op {
                state.writes.push((address, bytes.to_vec()));
            }
        }
        Ok(())
    }
}

// ── Device registry ─────────────────────────────────────────────────────────

/// Mock name directory.
#[derive(Debug, Default)]
pub struct MockRegistry {
    /// Names currently advertised.
    pub devices: Vec<&'static str>,
    /// Number of removals seen.
    pub removals: usize,
}

impl DeviceRegistry for MockRegistry {
    fn add_device(&mut self, name: &'static str) {
        self.devices.push(name);
    }

    fn remove_device(&mut self, name: &'static str) {
        self.devices.retain(|n| *n != name);
        self.removals = self.removals.saturating_add(1);
    }
}

// ── Sample stream ───────────────────────────────────────────────────────────

/// Chunk stream that fills a fixed pattern and counts traffic.
#[derive(Debug, Default)]
pub struct RecordingStream {
    pattern: u32,
    fill_limit: Option<usize>,
    fills: AtomicUsize,
    consumed_slots: AtomicUsize,
}

impl RecordingStream {
    /// Stream that fills every slot with `pattern`.
    pub fn new(pattern: u32) -> Self {
        Self {
            pattern,
            ..Self::default()
        }
    }

    /// Stream that produces at most `limit` slots per chunk (short chunks).
    pub fn with_fill_limit(pattern: u32, limit: usize) -> Self {
        Self {
            pattern,
            fill_limit: Some(limit),
            ..Self::default()
        }
    }

    /// Number of `fill_chunk` calls.
    pub fn fills(&self) -> usize {
        self.fills.load(Ordering::Acquire)
    }

    /// Total slots handed to `consume_chunk`.
    pub fn consumed_slots(&self) -> usize {
        self.consumed_slots.load(Ordering::Acquire)
    }
}

impl ChunkStream for RecordingStream {
    fn fill_chunk(&self, buffer: &mut [u32]) -> usize {
        self.fills.fetch_add(1, Ordering::AcqRel);
        let produced = self.fill_limit.map_or(buffer.len(), |limit| limit.min(buffer.len()));
        for slot in buffer.iter_mut().take(produced) {
            *slot = self.pattern;
        }
        produced
    }

    fn consume_chunk(&self, buffer: &[u32]) {
        self.consumed_slots.fetch_add(buffer.len(), Ordering::AcqRel);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    struct Echo;

    impl CompletionHandler for Echo {
        fn on_complete(&self, _direction: Direction, outcome: TransferOutcome<'_>) -> usize {
            match outcome {
                TransferOutcome::Completed(buffer) => buffer.len(),
                TransferOutcome::Failed => 0,
            }
        }
    }

    #[test]
    fn registers_behave_as_memory_and_log_writes() {
        let mut hw = MockPcmHardware::default();
        hw.write(PcmRegister::Mode, 0x1234);
        assert_eq!(hw.read(PcmRegister::Mode), 0x1234);
        assert_eq!(hw.events(), vec![HardwareEvent::Write(PcmRegister::Mode, 0x1234)]);
    }

    #[test]
    fn bus_depth_tracks_enter_exit() {
        let mut hw = MockPcmHardware::default();
        hw.enter();
        assert!(!hw.bus_released());
        hw.exit();
        assert!(hw.bus_released());
    }

    #[test]
    fn dma_cancel_takes_effect_after_inflight_buffer() {
        static ECHO: Echo = Echo;
        let mut dma = MockDma::new(32);
        dma.start(Direction::Transmit, &ECHO).unwrap();
        dma.cancel(Direction::Transmit);
        assert!(dma.is_active(Direction::Transmit));
        assert_eq!(dma.complete(Direction::Transmit).map(|(n, _)| n), Some(32));
        assert!(!dma.is_active(Direction::Transmit));
        assert!(dma.complete(Direction::Transmit).is_none());
    }

    #[test]
    fn dma_refused_start_registers_nothing() {
        static ECHO: Echo = Echo;
        let mut dma = MockDma::new(32);
        dma.refuse_start(Direction::Receive);
        assert_eq!(
            dma.start(Direction::Receive, &ECHO),
            Err(MockDmaExhausted(Direction::Receive))
        );
        assert!(!dma.has_handler(Direction::Receive));
    }

    #[test]
    fn i2c_nacks_unresponsive_addresses() {
        let mut bus = MockI2c::without(&[0x4C]);
        assert!(bus.write(0x4C, &[0x0D, 0x10]).is_err());
        assert!(bus.write(0x4D, &[0x0D, 0x10]).is_ok());
        assert_eq!(bus.attempts(), vec![0x4C, 0x4D]);
        assert_eq!(bus.writes(), vec![(0x4D, vec![0x0D, 0x10])]);
    }

    #[test]
    fn recording_stream_honours_fill_limit() {
        let stream = RecordingStream::with_fill_limit(7, 10);
        let mut buffer = [0u32; 32];
        assert_eq!(stream.fill_chunk(&mut buffer), 10);
        assert_eq!(buffer[9], 7);
        assert_eq!(buffer[10], 0);
        assert_eq!(stream.fills(), 1);
    }
}
