//! Cirrus/Wolfson WM8960 register writes
//!
//! Source: WM8960 datasheet Rev 4.4, register map and control interface.
//!
//! # Control word packing
//!
//! The WM8960 has 7-bit register addresses and 9-bit values, sent as one
//! 16-bit word, MSB first:
//!
//! ```text
//! byte 0: [ R6 R5 R4 R3 R2 R1 R0 | D8 ]
//! byte 1: [ D7 D6 D5 D4 D3 D2 D1 D0 ]
//! ```
//!
//! The chip is write-only; there is no read-back to verify the sequence.
//!
//! # Clocking
//!
//! The codec runs as I2S slave to the PCM block: SYSCLK comes from its
//! internal PLL referenced to the board's 24 MHz MCLK oscillator, and BCLK /
//! LRCLK are inputs.

/// Fixed control address (CSB/ADDR strapping is not available on this part).
pub const ADDRESS: u8 = 0x1A;

/// Largest 9-bit value.
pub const VALUE_MAX: u16 = 0x1FF;

/// One packed register write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PackedWrite {
    /// 7-bit register address.
    pub register: u8,
    /// 9-bit value.
    pub value: u16,
}

impl PackedWrite {
    const fn new(register: u8, value: u16) -> Self {
        Self { register, value }
    }

    /// Wire bytes of the transaction: value bit 8 in bit 0 of the first byte,
    /// register in bits 7..1.
    // A 7-bit register shifted by 9 fits u16; u16::from is not const.
    #[allow(clippy::arithmetic_side_effects, clippy::cast_lossless)]
    pub const fn bytes(self) -> [u8; 2] {
        let word = ((self.register as u16) << 9) | (self.value & VALUE_MAX);
        word.to_be_bytes()
    }
}

/// Bring-up writes, in order.
pub const INIT_SEQUENCE: [PackedWrite; 29] = [
    // Reset
    PackedWrite::new(15, 0x000),
    // Power: VMID, VREF, AINL/R, ADCL/R, MICB, PLL
    PackedWrite::new(25, 0x1FC),
    PackedWrite::new(26, 0x1F9),
    PackedWrite::new(47, 0x03C),
    // Clocking: SYSCLK from PLL, fractional PLL for 24 MHz MCLK
    PackedWrite::new(4, 0x001),
    PackedWrite::new(52, 0x027),
    PackedWrite::new(53, 0x086),
    PackedWrite::new(54, 0x0C2),
    PackedWrite::new(55, 0x026),
    // ADC/DAC: unmute DAC, 24-bit I2S slave
    PackedWrite::new(5, 0x000),
    PackedWrite::new(7, 0x002),
    // ALC and noise gate
    PackedWrite::new(20, 0x0F9),
    PackedWrite::new(17, 0x1FB),
    PackedWrite::new(18, 0x000),
    PackedWrite::new(19, 0x032),
    // OUT1 (headphone) volume
    PackedWrite::new(2, 0x16F),
    PackedWrite::new(3, 0x16F),
    // Speaker volume
    PackedWrite::new(40, 0x17F),
    PackedWrite::new(41, 0x178),
    PackedWrite::new(51, 0x08D),
    // Input PGA volume
    PackedWrite::new(0, 0x13F),
    PackedWrite::new(1, 0x13F),
    // Input signal path
    PackedWrite::new(32, 0x138),
    PackedWrite::new(33, 0x138),
    // Class D speaker outputs
    PackedWrite::new(49, 0x0F7),
    // DAC digital volume
    PackedWrite::new(10, 0x1FF),
    PackedWrite::new(11, 0x1FF),
    // Output mixers: DAC to left/right
    PackedWrite::new(34, 0x100),
    PackedWrite::new(37, 0x100),
];

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn value_bit_8_lands_in_first_byte() {
        assert_eq!(PackedWrite::new(25, 0x1FC).bytes(), [0x33, 0xFC]);
        assert_eq!(PackedWrite::new(47, 0x03C).bytes(), [0x5E, 0x3C]);
    }

    #[test]
    fn reset_is_first() {
        assert_eq!(INIT_SEQUENCE[0].bytes(), [0x1E, 0x00]);
    }

    #[test]
    fn every_entry_fits_the_field_widths() {
        for write in INIT_SEQUENCE {
            assert!(write.register < 0x80, "register {} exceeds 7 bits", write.register);
            assert!(write.value <= VALUE_MAX, "value {:#x} exceeds 9 bits", write.value);
        }
    }
}
