//! Canonical device names.
//!
//! Names follow what the vSphere client shows and double as lookup keys
//! for [`DeviceList::find`]:
//!
//! - controllers: `<tag>-<busNumber>` (`ide-1`, `pvscsi-0`)
//! - disks: `disk-<controller index>-<unitNumber>`, where the index is the
//!   position of the disk's controller among controllers of that kind
//! - other known kinds: `<tag>-<ordinal>` (`cdrom-0`, `ethernet-2`)
//! - anything else: `device-<key>`
//!
//! Ordinals count devices of the same family in list order. A device that
//! is not in the list (by identity, so a clone of a listed record counts as
//! not listed) gets the ordinal it would take once appended.

use std::collections::HashMap;

use crate::kind::DeviceKind;
use crate::list::DeviceList;
use crate::types::Device;

/// Derives names from the current composition of a device list.
pub struct NameResolver<'a> {
    devices: &'a DeviceList,
}

impl<'a> NameResolver<'a> {
    pub fn new(devices: &'a DeviceList) -> Self {
        Self { devices }
    }

    /// Family tag the name is built from.
    pub fn type_name(&self, device: &Device) -> &'static str {
        device.kind.tag()
    }

    pub fn name(&self, device: &Device) -> String {
        compose(device, || self.ordinal(device), |key| self.controller_index(key))
    }

    /// First device accepted by `filter` whose name is `name`.
    ///
    /// Names are built in a single pass over the list, carrying a running
    /// ordinal per family instead of re-resolving each candidate.
    pub fn find_where<F>(&self, name: &str, filter: F) -> Option<&'a Device>
    where
        F: Fn(&Device) -> bool,
    {
        let ranks = self.controller_ranks();
        let mut seen: HashMap<&'static str, usize> = HashMap::new();
        let found = self.devices.iter().find(|&d| {
            let slot = seen.entry(d.kind.tag()).or_insert(0);
            let ordinal = *slot;
            *slot += 1;
            filter(d)
                && compose(d, || ordinal, |key| ranks.get(&key).copied().unwrap_or(0)) == name
        });
        if found.is_none() {
            log::trace!("No device named '{}' among {} devices", name, self.devices.len());
        }
        found
    }

    /// Rank of `device` among same-family devices, in list order.
    fn ordinal(&self, device: &Device) -> usize {
        let tag = device.kind.tag();
        let mut seen = 0;
        for d in self.devices.iter().filter(|d| d.kind.tag() == tag) {
            if std::ptr::eq(d, device) {
                return seen;
            }
            seen += 1;
        }
        seen
    }

    /// Rank of the controller keyed `controller_key` among controllers of its kind.
    fn controller_index(&self, controller_key: i32) -> usize {
        let controller = match self.devices.find_by_key(controller_key) {
            Some(c) if c.is_controller() => c,
            _ => return 0,
        };
        self.devices
            .iter()
            .filter(|c| c.kind == controller.kind)
            .position(|c| c.key == controller_key)
            .unwrap_or(0)
    }

    /// `controller_index` for every controller in the list, keyed by controller key.
    fn controller_ranks(&self) -> HashMap<i32, usize> {
        let mut per_kind: HashMap<DeviceKind, usize> = HashMap::new();
        let mut ranks = HashMap::new();
        for c in self.devices.iter().filter(|d| d.is_controller()) {
            let slot = per_kind.entry(c.kind).or_insert(0);
            ranks.entry(c.key).or_insert(*slot);
            *slot += 1;
        }
        ranks
    }
}

fn compose<O, C>(device: &Device, ordinal: O, controller_index: C) -> String
where
    O: FnOnce() -> usize,
    C: FnOnce(i32) -> usize,
{
    let tag = device.kind.tag();
    match device.kind {
        kind if kind.is_controller() => format!("{tag}-{}", device.bus_number()),
        DeviceKind::Disk => format!(
            "{tag}-{}-{}",
            controller_index(device.controller_key),
            device.unit_number.unwrap_or(0)
        ),
        DeviceKind::Generic => format!("{tag}-{}", device.key),
        _ => format!("{tag}-{}", ordinal()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &DeviceList) -> Vec<String> {
        let r = NameResolver::new(list);
        list.iter().map(|d| r.name(d)).collect()
    }

    #[test]
    fn empty_records_on_an_empty_list() {
        let list = DeviceList::new();
        let r = NameResolver::new(&list);
        assert_eq!(r.name(&Device::new(DeviceKind::Cdrom, 0)), "cdrom-0");
        assert_eq!(r.name(&Device::new(DeviceKind::Disk, 0)), "disk-0-0");
        assert_eq!(r.name(&Device::new(DeviceKind::Floppy, 0)), "floppy-0");
        assert_eq!(r.name(&Device::new(DeviceKind::IdeController, 0)), "ide-0");
        assert_eq!(r.name(&Device::new(DeviceKind::VideoCard, 0)), "video-0");
        assert_eq!(r.name(&Device::new(DeviceKind::PointingDevice, 0)), "pointing-0");
        assert_eq!(r.name(&Device::new(DeviceKind::Keyboard, 0)), "keyboard-0");
        assert_eq!(r.name(&Device::new(DeviceKind::ParaVirtualScsiController, 0)), "pvscsi-0");
        assert_eq!(r.name(&Device::new(DeviceKind::SerialPort, 0)), "serialport-0");
    }

    #[test]
    fn controllers_use_bus_number() {
        let list: DeviceList = vec![
            Device::controller(DeviceKind::IdeController, 200, 0),
            Device::controller(DeviceKind::IdeController, 201, 1),
            Device::controller(DeviceKind::LsiLogicController, 1000, 0),
            Device::controller(DeviceKind::LsiLogicSasController, 1001, 1),
        ]
        .into_iter()
        .collect();
        assert_eq!(names(&list), ["ide-0", "ide-1", "lsilogic-0", "lsilogic-sas-1"]);
    }

    #[test]
    fn ethernet_ordinal_ignores_unit_number() {
        let list: DeviceList = vec![
            Device::new(DeviceKind::E1000, 4000).on_controller(100, 7),
            Device::new(DeviceKind::Vmxnet3, 4001).on_controller(100, 8),
        ]
        .into_iter()
        .collect();
        assert_eq!(names(&list), ["ethernet-0", "ethernet-1"]);
    }

    #[test]
    fn disks_are_named_by_controller_rank_and_unit() {
        let list: DeviceList = vec![
            Device::controller(DeviceKind::IdeController, 200, 0),
            Device::controller(DeviceKind::IdeController, 201, 1),
            Device::controller(DeviceKind::ParaVirtualScsiController, 1000, 0),
            Device::new(DeviceKind::Disk, 3000).on_controller(200, 0),
            Device::new(DeviceKind::Disk, 3002).on_controller(201, 1),
            Device::new(DeviceKind::Disk, 3003).on_controller(1000, 2),
        ]
        .into_iter()
        .collect();
        let n = names(&list);
        assert_eq!(&n[3..], ["disk-0-0", "disk-1-1", "disk-0-2"]);
    }

    #[test]
    fn ordinals_count_only_earlier_devices() {
        let list: DeviceList = vec![
            Device::new(DeviceKind::Cdrom, 3001),
            Device::new(DeviceKind::Floppy, 8000),
            Device::new(DeviceKind::Cdrom, 3005),
        ]
        .into_iter()
        .collect();
        assert_eq!(names(&list), ["cdrom-0", "floppy-0", "cdrom-1"]);
    }

    #[test]
    fn pending_device_takes_next_ordinal() {
        let list: DeviceList = vec![Device::new(DeviceKind::Cdrom, 3001)].into_iter().collect();
        let r = NameResolver::new(&list);
        assert_eq!(r.name(&Device::new(DeviceKind::Cdrom, -1)), "cdrom-1");
        assert_eq!(r.name(&list[0]), "cdrom-0");
    }

    #[test]
    fn pending_device_with_a_listed_key_is_still_pending() {
        let list: DeviceList = vec![
            Device::new(DeviceKind::Cdrom, 3001),
            Device::new(DeviceKind::Cdrom, 3002),
        ]
        .into_iter()
        .collect();
        let r = NameResolver::new(&list);
        assert_eq!(r.name(&Device::new(DeviceKind::Cdrom, 3001)), "cdrom-2");
        assert_eq!(r.name(&list[0].clone()), "cdrom-2");
        assert_eq!(r.name(&list[0]), "cdrom-0");
        assert_eq!(r.name(&list[1]), "cdrom-1");
    }

    #[test]
    fn duplicate_keys_keep_their_own_ordinals() {
        let list: DeviceList = vec![
            Device::new(DeviceKind::Floppy, 8000),
            Device::new(DeviceKind::Floppy, 8000),
        ]
        .into_iter()
        .collect();
        assert_eq!(names(&list), ["floppy-0", "floppy-1"]);
        let r = NameResolver::new(&list);
        assert!(std::ptr::eq(r.find_where("floppy-1", |_| true).unwrap(), &list[1]));
    }

    #[test]
    fn find_where_agrees_with_name() {
        let list: DeviceList = vec![
            Device::controller(DeviceKind::IdeController, 200, 0),
            Device::new(DeviceKind::Disk, 3002).on_controller(201, 0),
            Device::controller(DeviceKind::IdeController, 201, 1),
            Device::new(DeviceKind::Cdrom, 3001).on_controller(200, 1),
            Device::new(DeviceKind::Generic, 77),
        ]
        .into_iter()
        .collect();
        let r = NameResolver::new(&list);
        for d in &list {
            let found = r.find_where(&r.name(d), |_| true).unwrap();
            assert!(std::ptr::eq(found, d));
        }
        assert_eq!(r.name(&list[1]), "disk-1-0");
        assert!(r.find_where("cdrom-0", |d| d.is_controller()).is_none());
        assert!(r.find_where("cdrom-9", |_| true).is_none());
    }

    #[test]
    fn unknown_kinds_fall_back_to_key() {
        let list = DeviceList::new();
        let r = NameResolver::new(&list);
        assert_eq!(r.name(&Device::new(DeviceKind::Generic, 12345)), "device-12345");
        assert_eq!(r.type_name(&Device::new(DeviceKind::Generic, 1)), "device");
    }
}
