//! Unit number allocation.

use std::collections::HashSet;

use crate::kind::ControllerPolicy;
use crate::list::DeviceList;
use crate::types::Device;

/// Computes the lowest free address on a controller.
pub struct UnitAllocator<'a> {
    devices: &'a DeviceList,
}

impl<'a> UnitAllocator<'a> {
    pub fn new(devices: &'a DeviceList) -> Self {
        Self { devices }
    }

    /// Unit numbers in use on `controller`, taken from the devices that
    /// point at it rather than from its attached-key set.
    pub fn used_units(&self, controller: &Device) -> HashSet<i32> {
        self.devices
            .iter()
            .filter(|d| d.is_attached() && d.controller_key == controller.key)
            .filter_map(|d| d.unit_number)
            .collect()
    }

    /// Smallest non-negative unit that is neither used nor reserved.
    pub fn new_unit_number(&self, controller: &Device) -> i32 {
        let policy = controller.kind.policy().unwrap_or(ControllerPolicy::UNBOUNDED);
        let used = self.used_units(controller);

        let mut unit = 0;
        while used.contains(&unit) || policy.is_reserved(unit) {
            unit += 1;
        }
        log::trace!("Next unit on controller {}: {}", controller.key, unit);
        unit
    }
}
