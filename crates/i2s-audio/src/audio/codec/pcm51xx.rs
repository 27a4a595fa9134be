//! TI PCM5102A/PCM5122 (PCM51xx family) register writes
//!
//! Source: TI PCM512x datasheet (SLASE69), page 0 register map.
//!
//! Registers are 8-bit with 8-bit values; every write is one two-byte I2C
//! transaction `[register, value]`. The DAC powers up playing, so only three
//! writes are needed to make it lock onto a bit clock with no MCLK:
//!
//! - 0x0D: PLL reference = BCK (no MCLK on the PCM header)
//! - 0x25: ignore clock-error detection (SCK missing, BCK/LRCK halt)
//! - 0x41: disable auto-mute on zero data

/// Addresses the DAC strap pins select (ADR1/ADR2), in probe order.
pub const PROBE_ADDRESSES: [u8; 2] = [0x4C, 0x4D];

/// PLL reference register (page 0, register 13)
pub const REG_PLL_REF: u8 = 0x0D;

/// Error detection register (page 0, register 37)
pub const REG_ERROR_DETECT: u8 = 0x25;

/// Digital mute control register (page 0, register 65)
pub const REG_AUTO_MUTE: u8 = 0x41;

/// One `[register, value]` write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterWrite {
    /// Register address.
    pub register: u8,
    /// Value written.
    pub value: u8,
}

impl RegisterWrite {
    /// Wire bytes of the transaction.
    pub const fn bytes(self) -> [u8; 2] {
        [self.register, self.value]
    }
}

/// Bring-up writes, in order.
pub const INIT_SEQUENCE: [RegisterWrite; 3] = [
    // PLL reference clock = BCK
    RegisterWrite {
        register: REG_PLL_REF,
        value: 0x10,
    },
    // Ignore SCK, BCK and LRCK halt detection
    RegisterWrite {
        register: REG_ERROR_DETECT,
        value: 0x08,
    },
    // Auto-mute off
    RegisterWrite {
        register: REG_AUTO_MUTE,
        value: 0x04,
    },
];
