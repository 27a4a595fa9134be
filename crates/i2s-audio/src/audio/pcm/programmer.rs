//! PCM register sequences
//!
//! Every sequence runs inside one [`BusSession`], so the peripheral-bus guard
//! is taken once per call and released on every exit path. The guard is
//! never held between calls, in particular not while streaming.
//!
//! # Bring-up order
//!
//! ```text
//! CS_A = 0                     ── 10 µs
//! CS_A |= TXCLR | RXCLR        ── 10 µs
//! TXC_A = RXC_A = slot map
//! MODE_A = frame format (+ CLKM | FSM in slave role)
//! pins → PCM alternate function
//! CS_A |= STBY                 ── 50 µs
//! CS_A |= EN                   ── 10 µs
//! ```
//!
//! Teardown disables the block (50 µs), stops the bit clock in master role,
//! and returns the pins to inputs.

use core::ops::{Deref, DerefMut};

use platform::{ChunkSize, PcmRegister, PeripheralBus};

use super::registers::*;
use crate::audio::engine::{ClockRole, DeviceMode};
use crate::audio::pins::PcmPinout;
use crate::audio::PcmHardware;

/// Scoped peripheral-bus access: enters on creation, exits on drop.
///
/// Dereferences to the guarded hardware, so register accesses are written
/// against the session.
pub struct BusSession<'a, B: PeripheralBus + ?Sized> {
    bus: &'a mut B,
}

impl<'a, B: PeripheralBus + ?Sized> BusSession<'a, B> {
    /// Acquire the bus.
    pub fn enter(bus: &'a mut B) -> Self {
        bus.enter();
        Self { bus }
    }
}

impl<B: PeripheralBus + ?Sized> Deref for BusSession<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.bus
    }
}

impl<B: PeripheralBus + ?Sized> DerefMut for BusSession<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.bus
    }
}

impl<B: PeripheralBus + ?Sized> Drop for BusSession<'_, B> {
    fn drop(&mut self) {
        self.bus.exit();
    }
}

/// MODE_A value for `role`.
pub const fn mode_bits(role: ClockRole) -> u32 {
    match role {
        ClockRole::Master => MODE_MASTER,
        ClockRole::Slave => MODE_SLAVE,
    }
}

/// CS_A bits that start the directions `mode` uses.
///
/// Capture also turns on sign extension so 24-bit samples arrive as
/// full-width `i32` values.
pub const fn stream_enable_bits(mode: DeviceMode) -> u32 {
    let mut bits = 0;
    if mode.transmits() {
        bits |= CS_TXON;
    }
    if mode.receives() {
        bits |= CS_RXON | CS_RXSEX;
    }
    bits
}

/// Program the block from any state to enabled-but-idle and claim its pins.
///
/// The bit clock (master role) must already be running.
pub fn bring_up<H: PcmHardware>(hw: &mut H, mode: DeviceMode, role: ClockRole, pinout: PcmPinout) {
    let mut bus = BusSession::enter(hw);

    bus.write(PcmRegister::ControlStatus, 0);
    bus.delay_us(SETTLE_US);

    bus.modify(PcmRegister::ControlStatus, |cs| cs | CS_TXCLR | CS_RXCLR);
    bus.delay_us(SETTLE_US);

    bus.write(PcmRegister::TxConfig, SLOT_MAP);
    bus.write(PcmRegister::RxConfig, SLOT_MAP);
    bus.write(PcmRegister::Mode, mode_bits(role));

    pinout.claim(&mut *bus, mode);

    bus.modify(PcmRegister::ControlStatus, |cs| cs | CS_STBY);
    bus.delay_us(STANDBY_SETTLE_US);

    bus.modify(PcmRegister::ControlStatus, |cs| cs | CS_EN);
    bus.delay_us(SETTLE_US);

    debug!("pcm: block enabled, mode {:?}, role {:?}", mode, role);
}

/// Lower the DMA request levels for short chunks and enable DREQ generation.
pub fn arm_dma<H: PcmHardware>(hw: &mut H, mode: DeviceMode, chunk: ChunkSize) {
    let mut bus = BusSession::enter(hw);

    if chunk.get() < DREQ_DEFAULT_CHUNK_MIN {
        if mode.transmits() {
            bus.modify(PcmRegister::DmaRequest, |dreq| {
                (dreq & !DREQ_TX_MASK) | (DREQ_LOW_CHUNK_THRESHOLD << DREQ_TX_SHIFT)
            });
        }
        if mode.receives() {
            bus.modify(PcmRegister::DmaRequest, |dreq| {
                (dreq & !DREQ_RX_MASK) | (DREQ_LOW_CHUNK_THRESHOLD << DREQ_RX_SHIFT)
            });
        }
    }

    bus.modify(PcmRegister::ControlStatus, |cs| cs | CS_DMAEN);
}

/// Turn on the serial engine for the directions `mode` uses.
///
/// Call only once the DMA side of each direction is running, or the FIFO
/// under/overruns before the first descriptor is loaded.
pub fn enable_streams<H: PcmHardware>(hw: &mut H, mode: DeviceMode) {
    let mut bus = BusSession::enter(hw);
    bus.modify(PcmRegister::ControlStatus, |cs| cs | stream_enable_bits(mode));
}

/// Disable the block, stop the bit clock (master role) and release the pins.
pub fn teardown<H: PcmHardware>(hw: &mut H, mode: DeviceMode, role: ClockRole, pinout: PcmPinout) {
    {
        let mut bus = BusSession::enter(hw);
        bus.write(PcmRegister::ControlStatus, 0);
        bus.delay_us(STANDBY_SETTLE_US);
    }

    if role == ClockRole::Master {
        hw.stop();
    }

    pinout.release(hw, mode);

    debug!("pcm: block disabled, pins released");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use platform::mocks::{HardwareEvent, MockPcmHardware};
    use platform::PinFunction;
    use HardwareEvent::{BusEnter, BusExit, DelayUs, Write};
    use PcmRegister::{ControlStatus, DmaRequest, Mode, RxConfig, TxConfig};

    fn chunk(slots: usize) -> ChunkSize {
        ChunkSize::new(slots).unwrap()
    }

    /// Full bring-up event trace for a duplex master on the 40-pin header.
    #[test]
    fn bring_up_follows_documented_order() {
        let mut hw = MockPcmHardware::default();
        bring_up(&mut hw, DeviceMode::Duplex, ClockRole::Master, PcmPinout::standard());

        let a0 = PinFunction::Alternate0;
        let expected = vec![
            BusEnter,
            Write(ControlStatus, 0),
            DelayUs(10),
            Write(ControlStatus, CS_TXCLR | CS_RXCLR),
            DelayUs(10),
            Write(TxConfig, SLOT_MAP),
            Write(RxConfig, SLOT_MAP),
            Write(Mode, MODE_MASTER),
            HardwareEvent::Pin(18, a0),
            HardwareEvent::Pin(19, a0),
            HardwareEvent::Pin(20, a0),
            HardwareEvent::Pin(21, a0),
            Write(ControlStatus, CS_TXCLR | CS_RXCLR | CS_STBY),
            DelayUs(50),
            Write(ControlStatus, CS_TXCLR | CS_RXCLR | CS_STBY | CS_EN),
            DelayUs(10),
            BusExit,
        ];
        assert_eq!(hw.events(), expected);
        assert!(hw.bus_released());
    }

    #[test]
    fn slave_role_sets_clock_and_frame_sync_as_inputs() {
        let mut hw = MockPcmHardware::default();
        bring_up(&mut hw, DeviceMode::TxOnly, ClockRole::Slave, PcmPinout::standard());
        assert_eq!(hw.writes_to(Mode), vec![MODE_SLAVE]);
    }

    #[test]
    fn slot_maps_written_even_for_unused_direction() {
        let mut hw = MockPcmHardware::default();
        bring_up(&mut hw, DeviceMode::TxOnly, ClockRole::Master, PcmPinout::standard());
        assert_eq!(hw.writes_to(RxConfig), vec![SLOT_MAP]);
    }

    #[test]
    fn short_chunks_lower_both_dreq_levels() {
        let mut hw = MockPcmHardware::default();
        hw.set_register(DmaRequest, 0x3030);
        arm_dma(&mut hw, DeviceMode::Duplex, chunk(32));
        assert_eq!(hw.writes_to(DmaRequest), vec![0x1830, 0x1818]);
        assert_eq!(hw.register(ControlStatus) & CS_DMAEN, CS_DMAEN);
        assert!(hw.bus_released());
    }

    #[test]
    fn short_chunks_tx_only_leave_rx_level_alone() {
        let mut hw = MockPcmHardware::default();
        hw.set_register(DmaRequest, 0x3030);
        arm_dma(&mut hw, DeviceMode::TxOnly, chunk(48));
        assert_eq!(hw.writes_to(DmaRequest), vec![0x1830]);
    }

    #[test]
    fn default_chunks_keep_reset_dreq_levels() {
        let mut hw = MockPcmHardware::default();
        arm_dma(&mut hw, DeviceMode::Duplex, chunk(64));
        assert!(hw.writes_to(DmaRequest).is_empty());
        assert_eq!(hw.writes_to(ControlStatus), vec![CS_DMAEN]);
    }

    #[test]
    fn enable_bits_follow_mode() {
        assert_eq!(stream_enable_bits(DeviceMode::TxOnly), CS_TXON);
        assert_eq!(stream_enable_bits(DeviceMode::RxOnly), CS_RXON | CS_RXSEX);
        assert_eq!(
            stream_enable_bits(DeviceMode::Duplex),
            CS_TXON | CS_RXON | CS_RXSEX
        );
    }

    #[test]
    fn enable_streams_preserves_existing_bits() {
        let mut hw = MockPcmHardware::default();
        hw.set_register(ControlStatus, CS_EN | CS_STBY | CS_DMAEN);
        enable_streams(&mut hw, DeviceMode::TxOnly);
        assert_eq!(
            hw.register(ControlStatus),
            CS_EN | CS_STBY | CS_DMAEN | CS_TXON
        );
    }

    #[test]
    fn teardown_stops_clock_only_in_master_role() {
        let mut master = MockPcmHardware::default();
        teardown(&mut master, DeviceMode::Duplex, ClockRole::Master, PcmPinout::standard());
        assert!(master.events().contains(&HardwareEvent::ClockStop));

        let mut slave = MockPcmHardware::default();
        teardown(&mut slave, DeviceMode::Duplex, ClockRole::Slave, PcmPinout::standard());
        assert!(!slave.events().contains(&HardwareEvent::ClockStop));
    }

    #[test]
    fn teardown_disables_then_releases_pins() {
        let mut hw = MockPcmHardware::default();
        teardown(&mut hw, DeviceMode::RxOnly, ClockRole::Slave, PcmPinout::legacy_p5());
        let expected = vec![
            BusEnter,
            Write(ControlStatus, 0),
            DelayUs(50),
            BusExit,
            HardwareEvent::Pin(28, PinFunction::Input),
            HardwareEvent::Pin(29, PinFunction::Input),
            HardwareEvent::Pin(30, PinFunction::Input),
        ];
        assert_eq!(hw.events(), expected);
    }
}
