use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};

use crate::{
    package::PackageLayout,
    platform::{DefaultPlatformDetector, OsTypeOverride, Platform, PlatformDetector},
    runtime::{Runtime, path::normalize_path},
};

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub root: Option<PathBuf>,
    pub bin_dir: Option<PathBuf>,
    pub binary_name: Option<String>,
    pub link_name: Option<String>,
    pub os_type: Option<String>,
}

/// Everything a command needs, resolved once per run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub layout: PackageLayout,
    pub platform: Platform,
}

impl Config {
    /// The platform the overrides describe; never touches the filesystem.
    pub fn detect_platform(overrides: &ConfigOverrides) -> Platform {
        match &overrides.os_type {
            Some(os_type) => OsTypeOverride(os_type.clone()).detect(),
            None => DefaultPlatformDetector.detect(),
        }
    }

    pub fn load<R: Runtime>(runtime: &R, overrides: ConfigOverrides) -> Result<Self> {
        match overrides.os_type.clone() {
            Some(os_type) => {
                Self::load_with_detector(runtime, &OsTypeOverride(os_type), overrides)
            }
            None => Self::load_with_detector(runtime, &DefaultPlatformDetector, overrides),
        }
    }

    /// Like [`Config::load`], but the platform comes from `detector`; the
    /// `os_type` override is ignored.
    pub fn load_with_detector<R: Runtime, D: PlatformDetector>(
        runtime: &R,
        detector: &D,
        overrides: ConfigOverrides,
    ) -> Result<Self> {
        let platform = detector.detect();

        // Link targets are read relative to the link, not the current directory
        let root = match overrides.root {
            Some(root) if !root.has_root() => normalize_path(&runtime.current_dir()?.join(root)),
            Some(root) => root,
            None => default_package_root(runtime)?,
        };

        let mut layout = PackageLayout::new(root);
        if let Some(bin_dir) = overrides.bin_dir {
            layout = layout.with_bin_dir(&bin_dir);
        }
        if let Some(name) = overrides.binary_name {
            layout = layout.with_binary_stem(name);
        }
        if let Some(name) = overrides.link_name {
            layout = layout.with_link_name(name);
        }

        debug!("Resolved {:?} on {:?}", layout, platform);

        Ok(Self { layout, platform })
    }
}

/// The installer ships one level below the package root (`<root>/bin` or
/// `<root>/scripts`), so the root is the parent of the executable's directory.
#[tracing::instrument(skip(runtime))]
pub fn default_package_root<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    let exe = runtime.current_exe()?;
    exe.parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .with_context(|| format!("Could not determine package root from {:?}", exe))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HostPlatform;
    use crate::runtime::MockRuntime;

    #[test]
    fn test_default_package_root_is_parent_of_exe_dir() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_current_exe()
            .returning(|| Ok(PathBuf::from("/pkg/scripts/ppx-install")));

        let root = default_package_root(&runtime).unwrap();
        assert_eq!(root, PathBuf::from("/pkg"));
    }

    #[test]
    fn test_default_package_root_fails_at_filesystem_root() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_current_exe()
            .returning(|| Ok(PathBuf::from("/ppx-install")));

        assert!(default_package_root(&runtime).is_err());
    }

    #[test]
    fn test_load_uses_explicit_root_without_locating_exe() {
        let mut runtime = MockRuntime::new();
        runtime.expect_current_exe().never();

        let config = Config::load(
            &runtime,
            ConfigOverrides {
                root: Some(PathBuf::from("/pkg")),
                os_type: Some("Darwin".into()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(config.layout, PackageLayout::new("/pkg"));
        assert_eq!(config.platform.os, HostPlatform::Macos);
        assert_eq!(config.platform.os_type, "Darwin");
    }

    #[test]
    fn test_load_makes_relative_root_absolute() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_current_dir()
            .times(1)
            .returning(|| Ok(PathBuf::from("/work")));

        let config = Config::load(
            &runtime,
            ConfigOverrides {
                root: Some(PathBuf::from("./pkg")),
                os_type: Some("Linux".into()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(config.layout.root, PathBuf::from("/work/pkg"));
        assert_eq!(config.layout.link_path(), PathBuf::from("/work/pkg/ppx"));
        assert_eq!(
            config.layout.variant_path(config.platform.os),
            PathBuf::from("/work/pkg/bin/graphql_ppx.linux")
        );
    }

    #[test]
    fn test_detect_platform_uses_os_type_override() {
        let overrides = ConfigOverrides {
            os_type: Some("Windows_NT".into()),
            ..Default::default()
        };

        let platform = Config::detect_platform(&overrides);
        assert_eq!(platform.os, HostPlatform::Windows);
        assert_eq!(
            Config::detect_platform(&ConfigOverrides::default()),
            Platform::detect()
        );
    }

    #[test]
    fn test_load_applies_layout_overrides() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_current_exe()
            .returning(|| Ok(PathBuf::from("/pkg/bin/ppx-install")));

        let config = Config::load(
            &runtime,
            ConfigOverrides {
                bin_dir: Some(PathBuf::from("prebuilt")),
                binary_name: Some("other_ppx".into()),
                link_name: Some("other".into()),
                os_type: Some("Linux".into()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(config.layout.link_path(), PathBuf::from("/pkg/other"));
        assert_eq!(
            config.layout.variant_path(config.platform.os),
            PathBuf::from("/pkg/prebuilt/other_ppx.linux")
        );
    }

    #[test]
    fn test_load_detects_host_platform_by_default() {
        let runtime = MockRuntime::new();

        let config = Config::load(
            &runtime,
            ConfigOverrides {
                root: Some(PathBuf::from("/pkg")),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(config.platform, Platform::detect());
    }
}
