use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use hashbrown::DefaultHashBuilder;

use indexmap::IndexMap;

use crate::device::{Device, DeviceResource};

/// Lookup of devices and their resources.
///
/// The registry is owned by the hosting runtime. Implementations must be
/// safe to query concurrently from request handlers.
pub trait DeviceRegistry: Send + Sync {
    /// Returns the [`Device`] with the given name.
    ///
    /// If [`None`], the device does not exist.
    fn device(&self, name: &str) -> Option<Device>;

    /// Returns the [`DeviceResource`] of a device.
    ///
    /// If [`None`], either the device or the resource does not exist.
    fn device_resource(&self, device_name: &str, resource_name: &str) -> Option<DeviceResource> {
        self.device(device_name)
            .and_then(|device| device.resources.get(resource_name).cloned())
    }
}

/// An in-memory [`DeviceRegistry`].
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    devices: RwLock<IndexMap<String, Device, DefaultHashBuilder>>,
}

impl MemoryRegistry {
    /// Creates an empty [`MemoryRegistry`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a [`MemoryRegistry`] from a set of [`Device`]s.
    #[must_use]
    pub fn from_devices(devices: impl IntoIterator<Item = Device>) -> Self {
        let registry = Self::new();
        for device in devices {
            registry.add(device);
        }
        registry
    }

    /// Adds a [`Device`], replacing any device with the same name.
    pub fn add(&self, device: Device) {
        self.write().insert(device.name.clone(), device);
    }

    /// Removes a [`Device`], returning it.
    ///
    /// If [`None`], the device does not exist.
    pub fn remove(&self, name: &str) -> Option<Device> {
        self.write().shift_remove(name)
    }

    /// Returns the names of all registered devices.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Returns the number of registered devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Checks whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A poisoned lock still holds consistent data, since every write is a
    // single map operation.
    fn read(&self) -> RwLockReadGuard<'_, IndexMap<String, Device, DefaultHashBuilder>> {
        self.devices.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexMap<String, Device, DefaultHashBuilder>> {
        self.devices.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DeviceRegistry for MemoryRegistry {
    fn device(&self, name: &str) -> Option<Device> {
        self.read().get(name).cloned()
    }

    fn device_resource(&self, device_name: &str, resource_name: &str) -> Option<DeviceResource> {
        self.read()
            .get(device_name)
            .and_then(|device| device.resources.get(resource_name).cloned())
    }
}
