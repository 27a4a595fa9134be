//! Logical device-name directory.
//!
//! Devices advertise themselves under a fixed name for the lifetime of the
//! driver object. The directory is process-wide state, so it is passed to the
//! driver explicitly instead of being reached through a global.

/// Name directory that drivers register with.
pub trait DeviceRegistry {
    /// Advertise a device under `name`.
    fn add_device(&mut self, name: &'static str);

    /// Withdraw the device advertised under `name`.
    fn remove_device(&mut self, name: &'static str);
}

impl<T: DeviceRegistry + ?Sized> DeviceRegistry for &mut T {
    fn add_device(&mut self, name: &'static str) {
        (**self).add_device(name);
    }

    fn remove_device(&mut self, name: &'static str) {
        (**self).remove_device(name);
    }
}
