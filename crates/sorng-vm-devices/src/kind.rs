//! Device kind registry.
//!
//! Every kind the inventory can report is listed once here, together with
//! the abstract capabilities it satisfies, the display tag used for naming
//! and, for controllers, the attachment policy. Selection code only ever
//! tests capability membership, so a new controller flavour needs an arm in
//! each table below and nothing else.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Capabilities
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

bitflags! {
    /// Abstract classifications a device kind satisfies.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        /// Every virtual device.
        const DEVICE          = 1 << 0;
        /// Provides unit numbers for other devices on a numbered bus.
        const CONTROLLER      = 1 << 1;
        const SCSI_CONTROLLER = 1 << 2;
        const SATA_CONTROLLER = 1 << 3;
        const USB_CONTROLLER  = 1 << 4;
        /// Any virtual network adapter.
        const ETHERNET_CARD   = 1 << 5;
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Controller policy
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// SCSI adapters sit on their own bus at this unit number.
pub const SCSI_CONTROLLER_UNIT: i32 = 7;

/// Attachment rules for one controller kind. Fixed by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerPolicy {
    /// Maximum attached devices; `None` means no ceiling is enforced.
    pub max_devices: Option<usize>,
    /// Unit numbers never handed out, even when free.
    pub reserved_units: &'static [i32],
}

impl ControllerPolicy {
    pub const UNBOUNDED: Self = Self { max_devices: None, reserved_units: &[] };

    const fn bounded(max: usize) -> Self {
        Self { max_devices: Some(max), reserved_units: &[] }
    }

    /// Whether a controller holding `attached` devices can take one more.
    pub fn has_room(&self, attached: usize) -> bool {
        self.max_devices.map_or(true, |max| attached < max)
    }

    pub fn is_reserved(&self, unit: i32) -> bool {
        self.reserved_units.contains(&unit)
    }
}

const IDE_POLICY: ControllerPolicy = ControllerPolicy::bounded(2);
const PS2_POLICY: ControllerPolicy = ControllerPolicy::bounded(2);
// 16 targets on a wide SCSI bus, one taken by the adapter itself.
const SCSI_POLICY: ControllerPolicy = ControllerPolicy {
    max_devices: Some(15),
    reserved_units: &[SCSI_CONTROLLER_UNIT],
};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Device kinds
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Concrete device kind, serialised with the vSphere type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    // ── Storage ─────────────────────────────────────────────────────
    #[serde(rename = "VirtualDisk")]
    Disk,
    #[serde(rename = "VirtualCdrom")]
    Cdrom,
    #[serde(rename = "VirtualFloppy")]
    Floppy,

    // ── Network adapters ────────────────────────────────────────────
    #[serde(rename = "VirtualE1000")]
    E1000,
    #[serde(rename = "VirtualE1000e")]
    E1000e,
    #[serde(rename = "VirtualPCNet32")]
    PcNet32,
    #[serde(rename = "VirtualVmxnet2")]
    Vmxnet2,
    #[serde(rename = "VirtualVmxnet3")]
    Vmxnet3,
    #[serde(rename = "VirtualSriovEthernetCard")]
    SriovEthernetCard,

    // ── Input / display / ports ─────────────────────────────────────
    #[serde(rename = "VirtualKeyboard")]
    Keyboard,
    #[serde(rename = "VirtualPointingDevice")]
    PointingDevice,
    #[serde(rename = "VirtualMachineVideoCard")]
    VideoCard,
    #[serde(rename = "VirtualSerialPort")]
    SerialPort,
    #[serde(rename = "VirtualParallelPort")]
    ParallelPort,
    #[serde(rename = "VirtualMachineVMCIDevice")]
    VmciDevice,

    // ── Controllers ─────────────────────────────────────────────────
    #[serde(rename = "VirtualIDEController")]
    IdeController,
    #[serde(rename = "VirtualPS2Controller")]
    Ps2Controller,
    #[serde(rename = "VirtualPCIController")]
    PciController,
    #[serde(rename = "VirtualSIOController")]
    SioController,
    #[serde(rename = "VirtualAHCIController")]
    AhciController,
    #[serde(rename = "VirtualNVMEController")]
    NvmeController,
    #[serde(rename = "VirtualUSBController")]
    UsbController,
    #[serde(rename = "VirtualUSBXHCIController")]
    UsbXhciController,

    // ── SCSI controllers ────────────────────────────────────────────
    #[serde(rename = "VirtualLsiLogicController")]
    LsiLogicController,
    #[serde(rename = "VirtualLsiLogicSASController")]
    LsiLogicSasController,
    #[serde(rename = "VirtualBusLogicController")]
    BusLogicController,
    #[serde(rename = "ParaVirtualSCSIController")]
    ParaVirtualScsiController,

    /// Plain `VirtualDevice`, or any type name this crate does not know.
    #[serde(rename = "VirtualDevice")]
    #[serde(other)]
    Generic,
}

impl Default for DeviceKind {
    fn default() -> Self {
        Self::Generic
    }
}

impl DeviceKind {
    /// Capabilities this kind satisfies. Always includes `DEVICE`.
    pub fn capabilities(self) -> Capabilities {
        let extra = match self {
            Self::E1000
            | Self::E1000e
            | Self::PcNet32
            | Self::Vmxnet2
            | Self::Vmxnet3
            | Self::SriovEthernetCard => Capabilities::ETHERNET_CARD,

            Self::IdeController
            | Self::Ps2Controller
            | Self::PciController
            | Self::SioController
            | Self::NvmeController => Capabilities::CONTROLLER,
            Self::AhciController => Capabilities::CONTROLLER | Capabilities::SATA_CONTROLLER,
            Self::UsbController | Self::UsbXhciController => {
                Capabilities::CONTROLLER | Capabilities::USB_CONTROLLER
            }

            Self::LsiLogicController
            | Self::LsiLogicSasController
            | Self::BusLogicController
            | Self::ParaVirtualScsiController => {
                Capabilities::CONTROLLER | Capabilities::SCSI_CONTROLLER
            }

            Self::Disk
            | Self::Cdrom
            | Self::Floppy
            | Self::Keyboard
            | Self::PointingDevice
            | Self::VideoCard
            | Self::SerialPort
            | Self::ParallelPort
            | Self::VmciDevice
            | Self::Generic => Capabilities::empty(),
        };
        Capabilities::DEVICE | extra
    }

    pub fn is_controller(self) -> bool {
        self.capabilities().contains(Capabilities::CONTROLLER)
    }

    pub fn is_scsi_controller(self) -> bool {
        self.capabilities().contains(Capabilities::SCSI_CONTROLLER)
    }

    pub fn is_ethernet(self) -> bool {
        self.capabilities().contains(Capabilities::ETHERNET_CARD)
    }

    /// Attachment policy; `None` for anything that is not a controller.
    pub fn policy(self) -> Option<ControllerPolicy> {
        if !self.is_controller() {
            return None;
        }
        Some(match self {
            Self::IdeController => IDE_POLICY,
            Self::Ps2Controller => PS2_POLICY,
            k if k.is_scsi_controller() => SCSI_POLICY,
            _ => ControllerPolicy::UNBOUNDED,
        })
    }

    /// Display family used in canonical names (`ide`, `disk`, `ethernet`, ...).
    ///
    /// All network adapter flavours share the `ethernet` family.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Disk => "disk",
            Self::Cdrom => "cdrom",
            Self::Floppy => "floppy",
            Self::E1000
            | Self::E1000e
            | Self::PcNet32
            | Self::Vmxnet2
            | Self::Vmxnet3
            | Self::SriovEthernetCard => "ethernet",
            Self::Keyboard => "keyboard",
            Self::PointingDevice => "pointing",
            Self::VideoCard => "video",
            Self::SerialPort => "serialport",
            Self::ParallelPort => "parallelport",
            Self::VmciDevice => "vmci",
            Self::IdeController => "ide",
            Self::Ps2Controller => "ps2",
            Self::PciController => "pci",
            Self::SioController => "sio",
            Self::AhciController => "ahci",
            Self::NvmeController => "nvme",
            Self::UsbController => "usb",
            Self::UsbXhciController => "xhci",
            Self::LsiLogicController => "lsilogic",
            Self::LsiLogicSasController => "lsilogic-sas",
            Self::BusLogicController => "buslogic",
            Self::ParaVirtualScsiController => "pvscsi",
            Self::Generic => "device",
        }
    }

    /// vSphere type name, as found in inventory snapshots.
    pub fn as_api_str(self) -> &'static str {
        match self {
            Self::Disk => "VirtualDisk",
            Self::Cdrom => "VirtualCdrom",
            Self::Floppy => "VirtualFloppy",
            Self::E1000 => "VirtualE1000",
            Self::E1000e => "VirtualE1000e",
            Self::PcNet32 => "VirtualPCNet32",
            Self::Vmxnet2 => "VirtualVmxnet2",
            Self::Vmxnet3 => "VirtualVmxnet3",
            Self::SriovEthernetCard => "VirtualSriovEthernetCard",
            Self::Keyboard => "VirtualKeyboard",
            Self::PointingDevice => "VirtualPointingDevice",
            Self::VideoCard => "VirtualMachineVideoCard",
            Self::SerialPort => "VirtualSerialPort",
            Self::ParallelPort => "VirtualParallelPort",
            Self::VmciDevice => "VirtualMachineVMCIDevice",
            Self::IdeController => "VirtualIDEController",
            Self::Ps2Controller => "VirtualPS2Controller",
            Self::PciController => "VirtualPCIController",
            Self::SioController => "VirtualSIOController",
            Self::AhciController => "VirtualAHCIController",
            Self::NvmeController => "VirtualNVMEController",
            Self::UsbController => "VirtualUSBController",
            Self::UsbXhciController => "VirtualUSBXHCIController",
            Self::LsiLogicController => "VirtualLsiLogicController",
            Self::LsiLogicSasController => "VirtualLsiLogicSASController",
            Self::BusLogicController => "VirtualBusLogicController",
            Self::ParaVirtualScsiController => "ParaVirtualSCSIController",
            Self::Generic => "VirtualDevice",
        }
    }
}
