use anyhow::Result;
use log::{debug, info};

use crate::{
    error::InstallError,
    package::{LinkManager, LinkOutcome, LinkStyle},
    platform::Platform,
    runtime::Runtime,
};

use super::config::{Config, ConfigOverrides};

/// Link the binary variant for the host platform to the package's link path
#[tracing::instrument(skip(runtime, overrides))]
pub fn install<R: Runtime>(runtime: R, overrides: ConfigOverrides, style: LinkStyle) -> Result<()> {
    ensure_supported(&Config::detect_platform(&overrides))?;

    let config = Config::load(&runtime, overrides)?;
    let outcome = link_variant(&runtime, &config, style)?;

    println!(
        "Linked {} -> {}",
        outcome.link.display(),
        outcome.source.display()
    );
    Ok(())
}

/// Select the variant for `config.platform` and (re)create the link to it.
///
/// Fails with [`InstallError::UnsupportedPlatform`] before touching the
/// filesystem when no variant is shipped for the platform. The variant itself
/// is not checked for existence.
#[tracing::instrument(skip(runtime, config))]
pub fn link_variant<R: Runtime>(
    runtime: &R,
    config: &Config,
    style: LinkStyle,
) -> Result<LinkOutcome, InstallError> {
    let platform = &config.platform;
    ensure_supported(platform)?;

    let source = config.layout.variant_path(platform.os);
    let link = config.layout.link_path();
    debug!(
        "Selected {:?} for {} ({}, {})",
        source, platform.os, platform.os_type, platform.arch
    );

    let outcome = LinkManager::new(runtime).replace_link(&source, &link, style)?;
    if outcome.replaced {
        info!("Replaced existing entry at {:?}", link);
    }
    info!("Linked {:?} -> {:?}", outcome.link, outcome.stored);

    Ok(outcome)
}

fn ensure_supported(platform: &Platform) -> Result<(), InstallError> {
    if platform.os.is_supported() {
        Ok(())
    } else {
        Err(InstallError::UnsupportedPlatform {
            os_type: platform.os_type.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::PackageLayout;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::path::PathBuf;

    fn config_for(os_type: &str) -> Config {
        Config {
            layout: PackageLayout::new("/pkg"),
            platform: Platform::from_os_type(os_type, "x86_64"),
        }
    }

    /// Expect a clean install: nothing at the link path, then one symlink call.
    fn expect_fresh_link(runtime: &mut MockRuntime, stored: &str) {
        let link = PathBuf::from("/pkg/ppx");
        runtime
            .expect_is_symlink()
            .with(eq(link.clone()))
            .returning(|_| false);
        runtime
            .expect_exists()
            .with(eq(link.clone()))
            .returning(|_| false);
        runtime
            .expect_symlink()
            .with(eq(PathBuf::from(stored)), eq(link))
            .times(1)
            .returning(|_, _| Ok(()));
    }

    #[test_log::test]
    fn test_link_variant_darwin_selects_macos_binary() {
        let mut runtime = MockRuntime::new();
        expect_fresh_link(&mut runtime, "bin/graphql_ppx.macos");

        let outcome = link_variant(&runtime, &config_for("Darwin"), LinkStyle::Relative).unwrap();

        assert_eq!(outcome.source, PathBuf::from("/pkg/bin/graphql_ppx.macos"));
        assert_eq!(outcome.link, PathBuf::from("/pkg/ppx"));
        assert!(!outcome.replaced);
    }

    #[test]
    fn test_link_variant_linux_selects_linux_binary() {
        let mut runtime = MockRuntime::new();
        expect_fresh_link(&mut runtime, "bin/graphql_ppx.linux");

        let outcome = link_variant(&runtime, &config_for("Linux"), LinkStyle::Relative).unwrap();

        assert_eq!(outcome.source, PathBuf::from("/pkg/bin/graphql_ppx.linux"));
    }

    #[test]
    fn test_link_variant_unknown_os_gets_linux_binary() {
        let mut runtime = MockRuntime::new();
        expect_fresh_link(&mut runtime, "/pkg/bin/graphql_ppx.linux");

        let outcome = link_variant(&runtime, &config_for("FreeBSD"), LinkStyle::Absolute).unwrap();

        assert_eq!(outcome.stored, PathBuf::from("/pkg/bin/graphql_ppx.linux"));
    }

    #[test]
    fn test_link_variant_windows_is_unsupported_and_touches_nothing() {
        // No expectations: any runtime call would panic
        let runtime = MockRuntime::new();

        let err = link_variant(&runtime, &config_for("Windows_NT"), LinkStyle::Relative)
            .unwrap_err();

        match err {
            InstallError::UnsupportedPlatform { os_type } => assert_eq!(os_type, "Windows_NT"),
            other => panic!("Expected UnsupportedPlatform, got {:?}", other),
        }
    }

    #[test]
    fn test_link_variant_replaces_stale_link() {
        let mut runtime = MockRuntime::new();
        let link = PathBuf::from("/pkg/ppx");

        runtime
            .expect_is_symlink()
            .with(eq(link.clone()))
            .returning(|_| true);
        runtime
            .expect_remove_symlink()
            .with(eq(link.clone()))
            .times(1)
            .returning(|_| Ok(()));
        runtime
            .expect_symlink()
            .with(eq(PathBuf::from("bin/graphql_ppx.linux")), eq(link))
            .times(1)
            .returning(|_, _| Ok(()));

        let outcome = link_variant(&runtime, &config_for("Linux"), LinkStyle::Relative).unwrap();
        assert!(outcome.replaced);
    }

    #[test]
    fn test_link_variant_surfaces_filesystem_error() {
        let mut runtime = MockRuntime::new();
        runtime.expect_is_symlink().returning(|_| true);
        runtime
            .expect_remove_symlink()
            .returning(|_| Err(anyhow::anyhow!("Permission denied")));
        runtime.expect_symlink().never();

        let err = link_variant(&runtime, &config_for("Darwin"), LinkStyle::Relative).unwrap_err();
        assert!(matches!(err, InstallError::Filesystem { .. }));
    }

    #[test]
    fn test_install_with_explicit_root() {
        let mut runtime = MockRuntime::new();
        expect_fresh_link(&mut runtime, "bin/graphql_ppx.macos");

        install(
            runtime,
            ConfigOverrides {
                root: Some(PathBuf::from("/pkg")),
                os_type: Some("Darwin".into()),
                ..Default::default()
            },
            LinkStyle::Relative,
        )
        .unwrap();
    }

    #[test]
    fn test_install_windows_error_downcasts() {
        let runtime = MockRuntime::new();

        let err = install(
            runtime,
            ConfigOverrides {
                root: Some(PathBuf::from("/pkg")),
                os_type: Some("Windows_NT".into()),
                ..Default::default()
            },
            LinkStyle::Relative,
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<InstallError>(),
            Some(InstallError::UnsupportedPlatform { .. })
        ));
    }

    #[test]
    fn test_install_windows_fails_before_resolving_root() {
        let mut runtime = MockRuntime::new();
        runtime.expect_current_exe().never();
        runtime.expect_current_dir().never();

        let err = install(
            runtime,
            ConfigOverrides {
                os_type: Some("Windows_NT".into()),
                ..Default::default()
            },
            LinkStyle::Absolute,
        )
        .unwrap_err();

        match err.downcast_ref::<InstallError>() {
            Some(InstallError::UnsupportedPlatform { os_type }) => {
                assert_eq!(os_type, "Windows_NT")
            }
            other => panic!("Expected UnsupportedPlatform, got {:?}", other),
        }
    }
}
