//! PCM/I2S peripheral programming
//!
//! - `registers`: bit map of CS_A, MODE_A, TXC_A/RXC_A and DREQ_A
//! - `programmer`: bring-up, DMA arming, stream enable and teardown sequences

pub mod programmer;
pub mod registers;

pub use programmer::BusSession;
