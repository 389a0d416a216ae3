//! Error types for the VM device topology crate.

use std::fmt;

/// Categorised error kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceErrorKind {
    /// No device of the requested family matches the name
    NotFound,
    /// Inventory snapshot could not be parsed
    ParseError,
}

/// Crate error type carrying a kind + human-readable message.
#[derive(Debug, Clone)]
pub struct DeviceError {
    pub kind: DeviceErrorKind,
    pub message: String,
}

impl DeviceError {
    pub fn new(kind: DeviceErrorKind, msg: impl Into<String>) -> Self {
        Self { kind, message: msg.into() }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(DeviceErrorKind::NotFound, msg)
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::new(DeviceErrorKind::ParseError, msg)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == DeviceErrorKind::NotFound
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)
    }
}

impl std::error::Error for DeviceError {}

impl From<DeviceError> for String {
    fn from(e: DeviceError) -> String {
        e.to_string()
    }
}

impl From<serde_json::Error> for DeviceError {
    fn from(e: serde_json::Error) -> Self {
        Self::parse(format!("JSON parse error: {e}"))
    }
}

/// Convenience alias.
pub type DeviceResult<T> = Result<T, DeviceError>;
