use anyhow::{Result, bail};
use serde::Serialize;
use std::path::PathBuf;

use crate::{
    package::{LinkManager, LinkState},
    platform::HostPlatform,
    runtime::Runtime,
};

use super::config::{Config, ConfigOverrides};

/// What `status` found at the link path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    pub link: PathBuf,
    pub platform: HostPlatform,
    pub os_type: String,
    pub arch: String,
    /// Variant the link should point to; none on unsupported platforms
    pub expected: Option<PathBuf>,
    /// Target as stored in the link
    pub target: Option<PathBuf>,
    pub state: LinkState,
}

impl LinkReport {
    fn print(&self) {
        println!("Link:     {}", self.link.display());
        println!(
            "Platform: {} ({}, {})",
            self.platform, self.os_type, self.arch
        );
        match &self.expected {
            Some(expected) => println!("Expected: {}", expected.display()),
            None => println!("Expected: (unsupported platform)"),
        }
        if let Some(target) = &self.target {
            println!("Target:   {}", target.display());
        }
        println!("State:    {}", self.state.reason());
    }
}

/// Inspect the link path without changing anything.
#[tracing::instrument(skip(runtime, config))]
pub fn inspect<R: Runtime>(runtime: &R, config: &Config) -> LinkReport {
    let platform = &config.platform;
    let link = config.layout.link_path();
    let expected = platform
        .os
        .is_supported()
        .then(|| config.layout.variant_path(platform.os));

    let state = LinkManager::new(runtime).check_link(&link, expected.as_deref());
    let target = if runtime.is_symlink(&link) {
        runtime.read_link(&link).ok()
    } else {
        None
    };

    LinkReport {
        link,
        platform: platform.os,
        os_type: platform.os_type.clone(),
        arch: platform.arch.clone(),
        expected,
        target,
        state,
    }
}

/// Report the state of the link; with `check`, fail unless it is current.
#[tracing::instrument(skip(runtime, overrides))]
pub fn status<R: Runtime>(
    runtime: R,
    overrides: ConfigOverrides,
    json: bool,
    check: bool,
) -> Result<()> {
    let config = Config::load(&runtime, overrides)?;
    let report = inspect(&runtime, &config);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print();
    }

    if check && !report.state.is_current() {
        bail!("{} {}", report.link.display(), report.state.reason());
    }
    Ok(())
}
