//! The ordered device list and its public operations.
//!
//! `DeviceList` is built once from an inventory snapshot and only ever
//! grows. Order is insertion order; it drives name ordinals but never the
//! outcome of a key or name lookup beyond "first match wins".

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::controller::ControllerPicker;
use crate::error::{DeviceError, DeviceResult};
use crate::kind::{Capabilities, DeviceKind};
use crate::matcher::DeviceMatcher;
use crate::naming::NameResolver;
use crate::types::{ControllerBus, Device};
use crate::unit::UnitAllocator;

/// Append-only, ordered sequence of devices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceList {
    devices: Vec<Device>,
}

impl DeviceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a snapshot: a JSON array of device records.
    pub fn from_json(json: &str) -> DeviceResult<Self> {
        let devices: Vec<Device> = serde_json::from_str(json)?;
        log::debug!("Loaded device list with {} devices", devices.len());
        Ok(Self { devices })
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Device> {
        self.devices.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Device> {
        self.devices.get(index)
    }

    pub fn as_slice(&self) -> &[Device] {
        &self.devices
    }

    // ── Selection ───────────────────────────────────────────────────

    /// Devices for which `predicate` holds, in their original order.
    pub fn select<F>(&self, predicate: F) -> DeviceList
    where
        F: Fn(&Device) -> bool,
    {
        self.iter().filter(|&d| predicate(d)).cloned().collect()
    }

    /// Devices whose kind matches `matcher` (exact kind or capability).
    pub fn select_by_type<M: DeviceMatcher>(&self, matcher: M) -> DeviceList {
        self.select(|d| matcher.matches_device(d))
    }

    /// Devices attached to `controller`.
    pub fn children(&self, controller: &Device) -> DeviceList {
        self.select(|d| d.is_attached() && d.controller_key == controller.key)
    }

    pub fn find_by_key(&self, key: i32) -> Option<&Device> {
        self.iter().find(|d| d.key == key)
    }

    // ── Naming ──────────────────────────────────────────────────────

    /// Canonical name of `device` relative to this list.
    pub fn name(&self, device: &Device) -> String {
        NameResolver::new(self).name(device)
    }

    /// Display family of `device` (`disk`, `ethernet`, `ide`, ...).
    pub fn type_name(&self, device: &Device) -> &'static str {
        NameResolver::new(self).type_name(device)
    }

    /// First device whose canonical name is `name`.
    pub fn find(&self, name: &str) -> Option<&Device> {
        NameResolver::new(self).find_where(name, |_| true)
    }

    // ── Family lookups ──────────────────────────────────────────────

    /// Optical drive by name, or the first one when `name` is empty.
    pub fn find_cdrom(&self, name: &str) -> DeviceResult<&Device> {
        self.find_first(DeviceKind::Cdrom, name, "cdrom")
    }

    pub fn find_floppy(&self, name: &str) -> DeviceResult<&Device> {
        self.find_first(DeviceKind::Floppy, name, "floppy")
    }

    pub fn find_serial_port(&self, name: &str) -> DeviceResult<&Device> {
        self.find_first(DeviceKind::SerialPort, name, "serial port")
    }

    pub fn find_ide_controller(&self, name: &str) -> DeviceResult<&Device> {
        self.find_first(DeviceKind::IdeController, name, "IDE controller")
    }

    pub fn find_scsi_controller(&self, name: &str) -> DeviceResult<&Device> {
        self.find_first(Capabilities::SCSI_CONTROLLER, name, "SCSI controller")
    }

    fn find_first<M: DeviceMatcher>(
        &self,
        matcher: M,
        name: &str,
        what: &str,
    ) -> DeviceResult<&Device> {
        if name.is_empty() {
            return self
                .iter()
                .find(|d| matcher.matches_device(d))
                .ok_or_else(|| DeviceError::not_found(format!("No {what} device found")));
        }
        NameResolver::new(self)
            .find_where(name, |d| matcher.matches_device(d))
            .ok_or_else(|| DeviceError::not_found(format!("{what} '{name}' not found")))
    }

    // ── Attachment ──────────────────────────────────────────────────

    /// First non-full controller matching `matcher`, if any.
    pub fn pick_controller<M: DeviceMatcher>(&self, matcher: M) -> Option<&Device> {
        ControllerPicker::new(self).pick(matcher)
    }

    /// Lowest free unit number on `controller`.
    pub fn new_unit_number(&self, controller: &Device) -> i32 {
        UnitAllocator::new(self).new_unit_number(controller)
    }

    /// Point a new record at `controller` and give it the next free unit.
    ///
    /// The list itself is left alone; follow up with [`attach`](Self::attach).
    pub fn assign_controller(&self, device: &mut Device, controller: &Device) {
        device.controller_key = controller.key;
        device.unit_number = Some(self.new_unit_number(controller));
    }

    /// Append `device` and record it on its controller's attached-key set.
    ///
    /// This is the only mutation the list supports. The controller entry
    /// is updated only when it is present in this list.
    pub fn attach(&mut self, device: Device) {
        let (key, controller_key) = (device.key, device.controller_key);
        self.devices.push(device);
        if controller_key == 0 {
            return;
        }

        let controller = self
            .devices
            .iter_mut()
            .find(|d| d.key == controller_key && d.is_controller());
        match controller {
            Some(c) => {
                let bus = c.bus.get_or_insert_with(ControllerBus::default);
                if !bus.device.contains(&key) {
                    bus.device.push(key);
                }
                log::debug!("Attached device {} to controller {}", key, controller_key);
            }
            None => log::debug!(
                "Device {} references controller {} which is not in the list",
                key,
                controller_key
            ),
        }
    }
}

impl Index<usize> for DeviceList {
    type Output = Device;

    fn index(&self, index: usize) -> &Device {
        &self.devices[index]
    }
}

impl FromIterator<Device> for DeviceList {
    fn from_iter<I: IntoIterator<Item = Device>>(iter: I) -> Self {
        Self {
            devices: iter.into_iter().collect(),
        }
    }
}

/// Appends as-is, like `FromIterator`. Controllers' attached-key sets are
/// left alone; use [`DeviceList::attach`] to record occupancy.
impl Extend<Device> for DeviceList {
    fn extend<I: IntoIterator<Item = Device>>(&mut self, iter: I) {
        self.devices.extend(iter);
    }
}

impl From<Vec<Device>> for DeviceList {
    fn from(devices: Vec<Device>) -> Self {
        Self { devices }
    }
}

impl IntoIterator for DeviceList {
    type Item = Device;
    type IntoIter = std::vec::IntoIter<Device>;

    fn into_iter(self) -> Self::IntoIter {
        self.devices.into_iter()
    }
}

impl<'a> IntoIterator for &'a DeviceList {
    type Item = &'a Device;
    type IntoIter = std::slice::Iter<'a, Device>;

    fn into_iter(self) -> Self::IntoIter {
        self.devices.iter()
    }
}
