//! Controller selection for new attachments.

use crate::kind::ControllerPolicy;
use crate::list::DeviceList;
use crate::matcher::DeviceMatcher;
use crate::types::Device;

/// Finds a controller with room for one more device.
///
/// Occupancy is read from each controller's attached-key set, which the
/// caller keeps current (see [`DeviceList::attach`]). Picking never
/// reserves anything.
pub struct ControllerPicker<'a> {
    devices: &'a DeviceList,
}

impl<'a> ControllerPicker<'a> {
    pub fn new(devices: &'a DeviceList) -> Self {
        Self { devices }
    }

    /// First controller in list order that matches and is below its ceiling.
    pub fn pick<M: DeviceMatcher>(&self, matcher: M) -> Option<&'a Device> {
        let picked = self
            .devices
            .iter()
            .filter(|d| d.is_controller() && matcher.matches_device(d))
            .find(|c| self.has_room(c));
        match picked {
            Some(c) => log::debug!(
                "Picked controller {} (bus {}) for {:?}",
                c.key,
                c.bus_number(),
                matcher
            ),
            None => log::debug!("No controller with free capacity for {:?}", matcher),
        }
        picked
    }

    /// Whether `controller` can take another device.
    pub fn has_room(&self, controller: &Device) -> bool {
        let attached = controller.attached_keys().len();
        let policy = controller.kind.policy().unwrap_or(ControllerPolicy::UNBOUNDED);
        let room = policy.has_room(attached);
        if !room {
            log::trace!(
                "Controller {} ({}) is full: {} attached",
                controller.key,
                controller.kind.as_api_str(),
                attached
            );
        }
        room
    }
}
