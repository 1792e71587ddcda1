use serde::Serialize;
use std::fmt;

/// Operating system family a prebuilt binary variant exists for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HostPlatform {
    Linux,
    Macos,
    Windows,
}

impl HostPlatform {
    /// Classify a kernel-style OS identifier (`Linux`, `Darwin`, `Windows_NT`).
    ///
    /// Anything that is neither Windows nor Darwin is served the linux variant.
    pub fn from_os_type(os_type: &str) -> Self {
        if os_type.contains("Windows") {
            HostPlatform::Windows
        } else if os_type.contains("Darwin") {
            HostPlatform::Macos
        } else {
            HostPlatform::Linux
        }
    }

    /// Suffix of the binary variant file for this platform.
    pub fn as_str(&self) -> &'static str {
        match self {
            HostPlatform::Linux => "linux",
            HostPlatform::Macos => "macos",
            HostPlatform::Windows => "windows",
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, HostPlatform::Windows)
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform information for variant selection
#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    /// Raw OS identifier the platform was derived from
    pub os_type: String,
    pub os: HostPlatform,
    pub arch: String,
}

impl Platform {
    /// Detect the current platform
    pub fn detect() -> Self {
        Self::from_os_type(&Self::detect_os_type(), Self::detect_arch())
    }

    pub fn from_os_type(os_type: &str, arch: impl Into<String>) -> Self {
        Self {
            os_type: os_type.to_string(),
            os: HostPlatform::from_os_type(os_type),
            arch: arch.into(),
        }
    }

    /// OS identifier as `uname -s` (or Node's `os.type()`) would report it.
    fn detect_os_type() -> String {
        #[cfg(target_os = "macos")]
        {
            "Darwin".to_string()
        }
        #[cfg(target_os = "linux")]
        {
            "Linux".to_string()
        }
        #[cfg(target_os = "windows")]
        {
            "Windows_NT".to_string()
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            let os = std::env::consts::OS;
            let mut chars = os.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }

    pub(crate) fn detect_arch() -> String {
        #[cfg(target_arch = "x86_64")]
        {
            "x86_64".to_string()
        }
        #[cfg(target_arch = "aarch64")]
        {
            "aarch64".to_string()
        }
        #[cfg(target_arch = "x86")]
        {
            "i686".to_string()
        }
        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64", target_arch = "x86")))]
        {
            std::env::consts::ARCH.to_string()
        }
    }
}

/// Trait for platform detection (useful for testing)
pub trait PlatformDetector: Send + Sync {
    fn detect(&self) -> Platform;
}

/// Default platform detector using compile-time detection
pub struct DefaultPlatformDetector;

impl PlatformDetector for DefaultPlatformDetector {
    fn detect(&self) -> Platform {
        Platform::detect()
    }
}

/// Reports a fixed OS identifier instead of the host's; the architecture is
/// still the host's.
pub struct OsTypeOverride(pub String);

impl PlatformDetector for OsTypeOverride {
    fn detect(&self) -> Platform {
        Platform::from_os_type(&self.0, Platform::detect_arch())
    }
}
