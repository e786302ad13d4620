//! Coarse device-class hint used for simulator naming.

use serde::{Deserialize, Serialize};

/// Coarse device class reported by the identifier provider.
///
/// Only consulted when the identifier is a simulator-architecture marker;
/// real hardware identifiers resolve through the lookup table regardless of
/// the hint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceClass {
    /// No usable hint; also the fallback for unrecognized hints.
    #[default]
    Unspecified,
    /// Phone-sized device.
    Phone,
    /// Tablet-sized device.
    Tablet,
    /// Television set-top device.
    Tv,
    /// In-car display unit.
    CarDisplay,
    /// Desktop or laptop computer.
    Desktop,
}

impl DeviceClass {
    /// Parse a loose, case-insensitive hint string.
    ///
    /// Unknown values fall back to [`DeviceClass::Unspecified`].
    #[must_use]
    pub fn from_hint(hint: &str) -> Self {
        match hint.trim().to_ascii_lowercase().as_str() {
            "phone" => Self::Phone,
            "tablet" | "pad" => Self::Tablet,
            "tv" => Self::Tv,
            "car-display" | "carplay" | "car" => Self::CarDisplay,
            "desktop" | "mac" => Self::Desktop,
            _ => Self::Unspecified,
        }
    }
}
