//! GPIO pin function multiplexing
//!
//! The engine only ever switches pins between the PCM alternate function and
//! a safe input state, so the abstraction is a single multiplexer call per pin
//! (assign pin number + select mode).

/// Pin function selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinFunction {
    /// Plain input, the safe state pins return to on teardown.
    Input,
    /// Alternate function 0 (PCM on GPIO 18..21 of the 40-pin header).
    Alternate0,
    /// Alternate function 2 (PCM on GPIO 28..31, P5 header of early boards).
    Alternate2,
}

impl PinFunction {
    /// Value of the 3-bit GPFSEL field selecting this function.
    pub const fn fsel_bits(self) -> u8 {
        match self {
            Self::Input => 0b000,
            Self::Alternate0 => 0b100,
            Self::Alternate2 => 0b110,
        }
    }
}

/// Pin function multiplexer.
pub trait PinMux {
    /// Route `pin` (SoC GPIO number) to `function`.
    fn set_function(&mut self, pin: u8, function: PinFunction);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fsel_encoding_matches_gpfsel_table() {
        assert_eq!(PinFunction::Input.fsel_bits(), 0b000);
        assert_eq!(PinFunction::Alternate0.fsel_bits(), 0b100);
        assert_eq!(PinFunction::Alternate2.fsel_bits(), 0b110);
    }
}
