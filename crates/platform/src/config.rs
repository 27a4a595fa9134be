//! Application configuration and constants
//!
//! Central configuration values shared by the platform layer and the engine.
//! Naming should reference these constants rather than hardcoding values.

/// Logical name the I2S sound device is advertised under.
pub const DEVICE_NAME: &str = "sndi2s";
