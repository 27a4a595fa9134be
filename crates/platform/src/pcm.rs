//! PCM/I2S register block abstraction
//!
//! The serial audio peripheral is programmed through five 32-bit control
//! registers. Implementations map [`PcmRegister`] to the SoC's MMIO window;
//! mocks record the accesses instead.
//!
//! Register accesses must be bracketed by the platform's peripheral-bus
//! guard ([`PeripheralBus`]). On SoCs whose peripherals share one AXI/APB
//! bridge, switching between peripherals without the barrier pair can
//! reorder reads and writes.

/// PCM control registers touched by the streaming engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PcmRegister {
    /// CS_A: control and status (enable, FIFO clear, TX/RX on, DMA enable)
    ControlStatus,
    /// MODE_A: frame length, frame-sync length, clock/frame-sync direction
    Mode,
    /// RXC_A: receive channel slot configuration
    RxConfig,
    /// TXC_A: transmit channel slot configuration
    TxConfig,
    /// DREQ_A: DMA request thresholds
    DmaRequest,
}

impl PcmRegister {
    /// Byte offset of the register from the PCM peripheral base.
    pub const fn offset(self) -> usize {
        match self {
            Self::ControlStatus => 0x00,
            Self::Mode => 0x08,
            Self::RxConfig => 0x0C,
            Self::TxConfig => 0x10,
            Self::DmaRequest => 0x14,
        }
    }
}

/// Raw register access to the PCM peripheral.
pub trait PcmRegisters {
    /// Read a register.
    fn read(&mut self, reg: PcmRegister) -> u32;

    /// Write a register.
    fn write(&mut self, reg: PcmRegister, value: u32);

    /// Read-modify-write a register.
    fn modify(&mut self, reg: PcmRegister, f: impl FnOnce(u32) -> u32) {
        let value = self.read(reg);
        self.write(reg, f(value));
    }
}

/// Peripheral-bus access guard.
///
/// `enter` must be called before the first register access of a sequence and
/// `exit` after the last one. The engine never holds the guard across a whole
/// streaming session, only across one bring-up, arm, enable or teardown call.
pub trait PeripheralBus {
    /// Acquire exclusive access to the peripheral bus.
    fn enter(&mut self);

    /// Release the peripheral bus.
    fn exit(&mut self);
}
