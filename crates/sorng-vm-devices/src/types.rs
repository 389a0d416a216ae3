//! Device records as supplied by the inventory layer.

use serde::{Deserialize, Serialize};

use crate::kind::DeviceKind;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Description
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Display text for a device. Never used for identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Description {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub summary: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Controller bus
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Bus state owned by a controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerBus {
    /// Distinguishes controllers of the same kind (IDE bus 0 vs bus 1)
    #[serde(default)]
    pub bus_number: i32,
    /// Keys of the devices currently attached, in attachment order
    #[serde(default)]
    pub device: Vec<i32>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Device
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One piece of virtual hardware.
///
/// Controllers are devices whose `kind` carries the `CONTROLLER`
/// capability; their bus number and attached keys live in `bus`. A
/// controller record without `bus` reads as bus 0 with nothing attached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub kind: DeviceKind,
    /// Unique within a device list
    pub key: i32,
    /// Key of the parent controller; 0 when not attached
    #[serde(default)]
    pub controller_key: i32,
    /// Address on the parent controller; `None` until allocated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_number: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_info: Option<Description>,
    /// Kind-specific payload, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backing: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bus: Option<ControllerBus>,
}

impl Device {
    /// A bare record of the given kind.
    pub fn new(kind: DeviceKind, key: i32) -> Self {
        Self {
            kind,
            key,
            ..Default::default()
        }
    }

    /// A controller record on `bus_number` with nothing attached yet.
    pub fn controller(kind: DeviceKind, key: i32, bus_number: i32) -> Self {
        Self {
            bus: Some(ControllerBus {
                bus_number,
                device: Vec::new(),
            }),
            ..Self::new(kind, key)
        }
    }

    /// Place this record at `unit_number` on the controller keyed `controller_key`.
    pub fn on_controller(mut self, controller_key: i32, unit_number: i32) -> Self {
        self.controller_key = controller_key;
        self.unit_number = Some(unit_number);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>, summary: impl Into<String>) -> Self {
        self.device_info = Some(Description {
            label: label.into(),
            summary: summary.into(),
        });
        self
    }

    pub fn with_backing(mut self, backing: serde_json::Value) -> Self {
        self.backing = Some(backing);
        self
    }

    /// Record already-attached device keys (controllers only).
    pub fn with_attached(mut self, keys: &[i32]) -> Self {
        self.bus.get_or_insert_with(ControllerBus::default).device = keys.to_vec();
        self
    }

    pub fn is_controller(&self) -> bool {
        self.kind.is_controller()
    }

    /// Whether this device hangs off a controller.
    pub fn is_attached(&self) -> bool {
        self.controller_key != 0
    }

    pub fn bus_number(&self) -> i32 {
        self.bus.as_ref().map_or(0, |b| b.bus_number)
    }

    /// Keys of the devices attached to this controller.
    pub fn attached_keys(&self) -> &[i32] {
        match &self.bus {
            Some(bus) => &bus.device,
            None => &[],
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.device_info.as_ref().map(|d| d.label.as_str())
    }

    pub fn summary(&self) -> Option<&str> {
        self.device_info.as_ref().map(|d| d.summary.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_controller_reads_as_bus_zero() {
        let c = Device::new(DeviceKind::IdeController, 200);
        assert!(c.is_controller());
        assert_eq!(c.bus_number(), 0);
        assert!(c.attached_keys().is_empty());
    }

    #[test]
    fn builder_places_device_on_controller() {
        let d = Device::new(DeviceKind::Disk, 3000)
            .on_controller(200, 1)
            .with_label("Hard disk 1", "30,720 KB");
        assert!(d.is_attached());
        assert_eq!(d.unit_number, Some(1));
        assert_eq!(d.label(), Some("Hard disk 1"));
        assert_eq!(d.summary(), Some("30,720 KB"));
    }

    #[test]
    fn with_attached_creates_bus_when_missing() {
        let c = Device::new(DeviceKind::Ps2Controller, 300).with_attached(&[600, 700]);
        assert_eq!(c.attached_keys(), &[600, 700]);
        assert_eq!(c.bus_number(), 0);
    }

    #[test]
    fn deserializes_inventory_record() {
        let json = r#"{
            "kind": "VirtualIDEController",
            "key": 201,
            "deviceInfo": { "label": "IDE 1", "summary": "IDE 1" },
            "bus": { "busNumber": 1, "device": [3002] }
        }"#;
        let d: Device = serde_json::from_str(json).unwrap();
        assert_eq!(d.kind, DeviceKind::IdeController);
        assert_eq!(d.controller_key, 0);
        assert_eq!(d.unit_number, None);
        assert_eq!(d.bus_number(), 1);
        assert_eq!(d.attached_keys(), &[3002]);
    }

    #[test]
    fn backing_is_passed_through() {
        let json = r#"{
            "kind": "VirtualSerialPort",
            "key": 9000,
            "controllerKey": 400,
            "unitNumber": 0,
            "backing": { "serviceURI": "localhost:0", "direction": "client" }
        }"#;
        let d: Device = serde_json::from_str(json).unwrap();
        let out = serde_json::to_value(&d).unwrap();
        assert_eq!(out["backing"]["serviceURI"], "localhost:0");
        assert!(out.get("bus").is_none());
    }
}
