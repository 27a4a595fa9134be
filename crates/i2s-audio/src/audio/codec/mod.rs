//! External codec bring-up over I2C
//!
//! Two codec families are supported, told apart by address:
//!
//! | Address      | Family  | Wire format                       |
//! |--------------|---------|-----------------------------------|
//! | `0x1A`       | WM8960  | 7-bit register + 9-bit value      |
//! | anything else| PCM51xx | 8-bit register + 8-bit value      |
//!
//! A pinned address ([`CodecAddress::Fixed`]) must answer; failure is an
//! error. Probing ([`CodecAddress::Probe`]) walks [`PROBE_CHAIN`] and treats
//! an empty bus as a board without a configurable codec
//! ([`CodecStatus::Absent`]), which is not an error.
//!
//! Each table is written in order and aborts at the first failed transaction.

pub mod pcm51xx;
pub mod wm8960;

use embedded_hal::i2c::I2c;
use platform::CodecAddress;
use thiserror_no_std::Error;

/// Codec family, which selects the register table and wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecVariant {
    /// TI PCM51xx DAC.
    Pcm51xx,
    /// Cirrus/Wolfson WM8960 codec.
    Wm8960,
}

impl CodecVariant {
    /// Family expected at a caller-pinned `address`.
    pub const fn for_address(address: u8) -> Self {
        if address == wm8960::ADDRESS {
            Self::Wm8960
        } else {
            Self::Pcm51xx
        }
    }
}

/// Candidates tried, in order, when the address is [`CodecAddress::Probe`].
pub const PROBE_CHAIN: [(u8, CodecVariant); 3] = [
    (pcm51xx::PROBE_ADDRESSES[0], CodecVariant::Pcm51xx),
    (pcm51xx::PROBE_ADDRESSES[1], CodecVariant::Pcm51xx),
    (wm8960::ADDRESS, CodecVariant::Wm8960),
];

/// Outcome of a successful bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecStatus {
    /// A codec accepted its whole register table.
    Configured {
        /// Family written.
        variant: CodecVariant,
        /// Address that answered.
        address: u8,
    },
    /// Probing found no codec; the link runs with whatever the board has.
    Absent,
}

/// Bring-up failure at a pinned address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodecError<E> {
    /// A write to the codec failed.
    #[error("{variant:?} codec at {address:#04x} did not accept its register table: {error:?}")]
    Unresponsive {
        /// Family being configured.
        variant: CodecVariant,
        /// Pinned address.
        address: u8,
        /// Bus error of the failed transaction.
        error: E,
    },
}

/// Write `variant`'s register table to the codec at `address`.
///
/// Stops at the first failed transaction.
pub fn configure<I: I2c>(i2c: &mut I, variant: CodecVariant, address: u8) -> Result<(), I::Error> {
    match variant {
        CodecVariant::Pcm51xx => {
            for write in pcm51xx::INIT_SEQUENCE {
                i2c.write(address, &write.bytes())?;
            }
        }
        CodecVariant::Wm8960 => {
            for write in wm8960::INIT_SEQUENCE {
                i2c.write(address, &write.bytes())?;
            }
        }
    }
    Ok(())
}

/// Configure the codec selected by `address`.
///
/// # Errors
///
/// [`CodecError::Unresponsive`] only for a [`CodecAddress::Fixed`] address.
/// Probing never fails; an empty bus yields [`CodecStatus::Absent`].
pub fn bring_up<I: I2c>(
    i2c: &mut I,
    address: CodecAddress,
) -> Result<CodecStatus, CodecError<I::Error>> {
    match address {
        CodecAddress::Fixed(address) => {
            let variant = CodecVariant::for_address(address);
            configure(i2c, variant, address).map_err(|error| {
                warn!("codec: {:?} at {:#x} failed", variant, address);
                CodecError::Unresponsive {
                    variant,
                    address,
                    error,
                }
            })?;
            info!("codec: {:?} configured at {:#x}", variant, address);
            Ok(CodecStatus::Configured { variant, address })
        }
        CodecAddress::Probe => {
            for (address, variant) in PROBE_CHAIN {
                if configure(i2c, variant, address).is_ok() {
                    info!("codec: {:?} found at {:#x}", variant, address);
                    return Ok(CodecStatus::Configured { variant, address });
                }
                debug!("codec: no {:?} at {:#x}", variant, address);
            }
            info!("codec: none found, streaming unconfigured");
            Ok(CodecStatus::Absent)
        }
    }
}
