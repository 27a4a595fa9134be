//! PCM pin routing
//!
//! The PCM block has four signals: bit clock, frame sync, data in and data
//! out. Boards route them to GPIO 18..21 (40-pin header, ALT0), except the
//! earliest models, which only bring them out on the P5 header at GPIO 28..31
//! (ALT2).
//!
//! | Signal | Offset | Claimed when |
//! |--------|--------|--------------|
//! | CLK    | +0     | always       |
//! | FS     | +1     | always       |
//! | DIN    | +2     | mode receives|
//! | DOUT   | +3     | mode transmits|

use platform::{PinFunction, PinMux};

use crate::audio::engine::DeviceMode;

/// GPIO base pin and alternate function carrying the PCM signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PcmPinout {
    /// GPIO number of the bit-clock pin; the other signals follow it.
    pub base: u8,
    /// Alternate function selecting the PCM block on these pins.
    pub function: PinFunction,
}

impl PcmPinout {
    /// 40-pin header: GPIO 18..21 on ALT0.
    pub const fn standard() -> Self {
        Self {
            base: 18,
            function: PinFunction::Alternate0,
        }
    }

    /// P5 header of the Model A and the 256/512 MB revision-2 Model B:
    /// GPIO 28..31 on ALT2.
    pub const fn legacy_p5() -> Self {
        Self {
            base: 28,
            function: PinFunction::Alternate2,
        }
    }

    /// Bit-clock pin.
    pub const fn clk(self) -> u8 {
        self.base
    }

    /// Frame-sync pin.
    pub const fn fs(self) -> u8 {
        self.base.saturating_add(1)
    }

    /// Data-in pin (capture).
    pub const fn din(self) -> u8 {
        self.base.saturating_add(2)
    }

    /// Data-out pin (playback).
    pub const fn dout(self) -> u8 {
        self.base.saturating_add(3)
    }

    /// Route the pins `mode` uses to the PCM block.
    pub fn claim<M: PinMux + ?Sized>(self, mux: &mut M, mode: DeviceMode) {
        self.apply(mux, mode, self.function);
    }

    /// Return the pins `mode` uses to plain inputs.
    pub fn release<M: PinMux + ?Sized>(self, mux: &mut M, mode: DeviceMode) {
        self.apply(mux, mode, PinFunction::Input);
    }

    fn apply<M: PinMux + ?Sized>(self, mux: &mut M, mode: DeviceMode, function: PinFunction) {
        mux.set_function(self.clk(), function);
        mux.set_function(self.fs(), function);
        if mode.receives() {
            mux.set_function(self.din(), function);
        }
        if mode.transmits() {
            mux.set_function(self.dout(), function);
        }
    }
}

impl Default for PcmPinout {
    fn default() -> Self {
        Self::standard()
    }
}
