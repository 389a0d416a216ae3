//! # SortOfRemote NG – VM Device Topology
//!
//! In-memory model of a virtual machine's hardware: controllers, the
//! devices attached to them, and the rules vSphere applies when a new
//! device is attached. Answers "which devices match this type?", "which
//! controller has room, and at what unit number?" and "what is this
//! device called?". Transport and inventory traversal live elsewhere.
//!
//! ## Modules
//!
//! - **types** — Device records (`Device`, `Description`, `ControllerBus`)
//! - **kind** — Device kind registry, capability sets, controller policies
//! - **error** — Crate-specific error types
//! - **matcher** — Polymorphic type selection (exact kind or capability)
//! - **naming** — Canonical device names (`ide-0`, `disk-1-0`, `ethernet-0`)
//! - **controller** — Picks a non-full controller of a requested type
//! - **unit** — Lowest free unit number on a controller
//! - **list** — `DeviceList`, the ordered container and public facade

pub mod types;
pub mod kind;
pub mod error;
pub mod matcher;
pub mod naming;
pub mod controller;
pub mod unit;
pub mod list;

pub use error::{DeviceError, DeviceErrorKind, DeviceResult};
pub use kind::{Capabilities, ControllerPolicy, DeviceKind};
pub use list::DeviceList;
pub use matcher::DeviceMatcher;
pub use types::{ControllerBus, Description, Device};
