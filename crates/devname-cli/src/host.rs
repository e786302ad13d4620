//! Host identifier provider.

use devname_core::{DeviceClass, IdentifierProviderPort};

/// Environment variable overriding the detected host identifier.
pub const IDENTIFIER_ENV: &str = "DEVNAME_IDENTIFIER";

/// Supplies the host machine's identifier.
///
/// `DEVNAME_IDENTIFIER` takes priority; otherwise the CPU architecture
/// string reported by the OS is used (e.g. `"x86_64"`, `"arm64"`), which the
/// resolver classifies through its simulator branch on non-Apple hardware.
#[derive(Debug, Clone)]
pub struct HostIdentifierProvider {
    device_class: DeviceClass,
}

impl HostIdentifierProvider {
    /// Create a provider reporting the given device class.
    #[must_use]
    pub fn new(device_class: DeviceClass) -> Self {
        Self { device_class }
    }
}

impl IdentifierProviderPort for HostIdentifierProvider {
    fn identifier(&self) -> String {
        if let Ok(identifier) = std::env::var(IDENTIFIER_ENV)
            && !identifier.is_empty()
        {
            return identifier;
        }
        let arch = sysinfo::System::cpu_arch();
        if arch.is_empty() {
            "unknown".to_string()
        } else {
            arch
        }
    }

    fn device_class(&self) -> DeviceClass {
        self.device_class
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_the_configured_device_class() {
        let provider = HostIdentifierProvider::new(DeviceClass::Desktop);
        assert_eq!(provider.device_class(), DeviceClass::Desktop);
    }

    #[test]
    fn identifier_is_never_empty() {
        let provider = HostIdentifierProvider::new(DeviceClass::Unspecified);
        assert!(!provider.identifier().is_empty());
    }
}
