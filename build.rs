use std::{env, process::Command};

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
    println!("cargo:rerun-if-env-changed=PPX_INSTALL_RUN_CROSS_WINDOWS_TESTS");
    println!("cargo::rustc-check-cfg=cfg(ppx_install_skip_cross_windows_tests)");

    if cross_compiling_to_windows() && env::var_os("PPX_INSTALL_RUN_CROSS_WINDOWS_TESTS").is_none() {
        println!("cargo:rustc-cfg=ppx_install_skip_cross_windows_tests");
    }

    let version = git_version().unwrap_or_else(|| {
        format!("{}-unknown", env::var("CARGO_PKG_VERSION").unwrap_or_default())
    });
    println!("cargo:rustc-env=PPX_INSTALL_VERSION={version}");
}

/// Symlink tests cannot run on the build host when only the target is Windows.
fn cross_compiling_to_windows() -> bool {
    let is_windows = |var: &str| env::var(var).is_ok_and(|triple| triple.contains("windows"));
    is_windows("TARGET") && !is_windows("HOST")
}

/// `git describe` output without the leading `v` of the tag.
fn git_version() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|output| output.status.success())?;

    let described = String::from_utf8(output.stdout).ok()?;
    let described = described.trim();
    let version = described.strip_prefix('v').unwrap_or(described);
    (!version.is_empty()).then(|| version.to_string())
}
