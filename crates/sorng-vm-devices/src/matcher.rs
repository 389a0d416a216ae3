//! Polymorphic type selection.
//!
//! A request is either an exact [`DeviceKind`] ("IDE controller") or a
//! [`Capabilities`] set ("any SCSI controller", "any controller"). The
//! capability form matches every kind that declares all requested bits.

use std::fmt;

use crate::kind::{Capabilities, DeviceKind};
use crate::types::Device;

/// Something a device kind can be tested against.
pub trait DeviceMatcher: fmt::Debug {
    fn matches(&self, kind: DeviceKind) -> bool;

    fn matches_device(&self, device: &Device) -> bool {
        self.matches(device.kind)
    }
}

impl DeviceMatcher for DeviceKind {
    fn matches(&self, kind: DeviceKind) -> bool {
        *self == kind
    }
}

impl DeviceMatcher for Capabilities {
    fn matches(&self, kind: DeviceKind) -> bool {
        kind.capabilities().contains(*self)
    }
}

impl<M: DeviceMatcher + ?Sized> DeviceMatcher for &M {
    fn matches(&self, kind: DeviceKind) -> bool {
        (**self).matches(kind)
    }
}
