//! BCM283x/BCM2711 PCM/I2S register map
//!
//! Source: BCM2835 ARM Peripherals, chapter 8 (PCM / I2S Audio), and the
//! BCM2711 ARM Peripherals datasheet (identical block).
//!
//! # Key constraints
//!
//! ## Settle delays
//! The block runs from the PCM clock, not the APB clock. A write to CS_A that
//! clears FIFOs or leaves standby only takes effect after a few PCM clock
//! cycles; the engine waits a fixed time after each such write instead of
//! polling the SYNC bit.
//!
//! ## Slot map is programmed for both directions
//! TXC_A and RXC_A are always written, whatever the device mode. An unused
//! direction is gated by TXON/RXON in CS_A, not by its slot map.
//!
//! ## DREQ thresholds
//! The reset thresholds assume DMA bursts of 64 slots or more. Smaller chunks
//! need the TX/RX request level lowered to [`DREQ_LOW_CHUNK_THRESHOLD`] or the
//! FIFO under/overruns between completions.

use crate::audio::clock_math::{BITS_PER_FRAME, SLOT_BITS};

// ---------------------------------------------------------------------------
// CS_A: control and status
// ---------------------------------------------------------------------------

/// RAM standby release (set to leave standby)
pub const CS_STBY: u32 = 1 << 25;

/// RX sign extend: replicate bit 23 of a 24-bit sample into bits 31..24
pub const CS_RXSEX: u32 = 1 << 23;

/// DMA DREQ enable
pub const CS_DMAEN: u32 = 1 << 9;

/// Clear RX FIFO (self-clearing)
pub const CS_RXCLR: u32 = 1 << 4;

/// Clear TX FIFO (self-clearing)
pub const CS_TXCLR: u32 = 1 << 3;

/// Enable transmission
pub const CS_TXON: u32 = 1 << 2;

/// Enable reception
pub const CS_RXON: u32 = 1 << 1;

/// Enable the PCM block
pub const CS_EN: u32 = 1 << 0;

// ---------------------------------------------------------------------------
// MODE_A: frame format and clock direction
// ---------------------------------------------------------------------------

/// Sample on the inverted clock edge (I2S samples on the rising edge)
pub const MODE_CLKI: u32 = 1 << 22;

/// Clock is an input (slave)
pub const MODE_CLKM: u32 = 1 << 23;

/// Invert frame sync (I2S: left channel while FS is low)
pub const MODE_FSI: u32 = 1 << 20;

/// Frame sync is an input (slave)
pub const MODE_FSM: u32 = 1 << 21;

/// Frame length field (bit clocks per frame minus one)
pub const MODE_FLEN_SHIFT: u32 = 10;

/// Frame sync length field (bit clocks FS is held asserted)
pub const MODE_FSLEN_SHIFT: u32 = 0;

// ---------------------------------------------------------------------------
// TXC_A / RXC_A: channel slot map (same layout for both registers)
// ---------------------------------------------------------------------------

/// Channel 1 width extension (adds 16 to the width field)
pub const CH1WEX: u32 = 1 << 31;

/// Channel 1 enable
pub const CH1EN: u32 = 1 << 30;

/// Channel 1 position field (bit clock at which the slot starts)
pub const CH1POS_SHIFT: u32 = 20;

/// Channel 1 width field (width minus 8, in bits)
pub const CH1WID_SHIFT: u32 = 16;

/// Channel 2 width extension
pub const CH2WEX: u32 = 1 << 15;

/// Channel 2 enable
pub const CH2EN: u32 = 1 << 14;

/// Channel 2 position field
pub const CH2POS_SHIFT: u32 = 4;

/// Channel 2 width field
pub const CH2WID_SHIFT: u32 = 0;

// ---------------------------------------------------------------------------
// DREQ_A: DMA request thresholds
// ---------------------------------------------------------------------------

/// TX request level field
pub const DREQ_TX_SHIFT: u32 = 8;

/// TX request level mask
pub const DREQ_TX_MASK: u32 = 0x7F << DREQ_TX_SHIFT;

/// RX request level field
pub const DREQ_RX_SHIFT: u32 = 0;

/// RX request level mask
pub const DREQ_RX_MASK: u32 = 0x7F << DREQ_RX_SHIFT;

/// Request level used when chunks are shorter than
/// [`DREQ_DEFAULT_CHUNK_MIN`] slots.
pub const DREQ_LOW_CHUNK_THRESHOLD: u32 = 0x18;

/// Smallest chunk for which the reset DREQ levels are adequate.
pub const DREQ_DEFAULT_CHUNK_MIN: usize = 64;

// ---------------------------------------------------------------------------
// Composite values
// ---------------------------------------------------------------------------

/// Slot map shared by TXC_A and RXC_A: two 32-bit slots (WEX set, width
/// fields 0), channel 1 at bit clock 1, channel 2 at bit clock 33. The
/// one-clock offset is the I2S data delay after the FS edge.
pub const SLOT_MAP: u32 =
    CH1WEX | CH1EN | (1 << CH1POS_SHIFT) | CH2WEX | CH2EN | ((SLOT_BITS + 1) << CH2POS_SHIFT);

/// MODE_A for master role: 64-clock frames, FS asserted for one slot,
/// clock and frame sync driven by this block.
pub const MODE_MASTER: u32 = MODE_CLKI
    | MODE_FSI
    | ((BITS_PER_FRAME - 1) << MODE_FLEN_SHIFT)
    | (SLOT_BITS << MODE_FSLEN_SHIFT);

/// MODE_A for slave role: as [`MODE_MASTER`] with clock and frame sync as inputs.
pub const MODE_SLAVE: u32 = MODE_MASTER | MODE_CLKM | MODE_FSM;

// ---------------------------------------------------------------------------
// Settle delays (µs)
// ---------------------------------------------------------------------------

/// After disabling the block or clearing FIFOs, and after setting EN.
pub const SETTLE_US: u32 = 10;

/// After leaving standby, and after the teardown disable.
pub const STANDBY_SETTLE_US: u32 = 50;
