//! Platform detection module
//!
//! Detects the host operating system (and architecture) and classifies it into
//! one of the platforms a prebuilt binary variant exists for.

mod detection;

pub use detection::{
    DefaultPlatformDetector, HostPlatform, OsTypeOverride, Platform, PlatformDetector,
};
