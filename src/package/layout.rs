use std::path::{Path, PathBuf};

use crate::platform::HostPlatform;

pub const DEFAULT_BIN_DIR: &str = "bin";
pub const DEFAULT_BINARY_STEM: &str = "graphql_ppx";
pub const DEFAULT_LINK_NAME: &str = "ppx";

/// Where the prebuilt variants live and where the link goes, relative to a
/// package root:
///
/// ```text
/// <root>/
///   bin/graphql_ppx.linux
///   bin/graphql_ppx.macos
///   ppx -> bin/graphql_ppx.<platform>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
    pub root: PathBuf,
    pub bin_dir: PathBuf,
    pub binary_stem: String,
    pub link_name: String,
}

impl PackageLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            bin_dir: root.join(DEFAULT_BIN_DIR),
            root,
            binary_stem: DEFAULT_BINARY_STEM.to_string(),
            link_name: DEFAULT_LINK_NAME.to_string(),
        }
    }

    /// Relative directories are taken relative to the package root.
    pub fn with_bin_dir(mut self, bin_dir: &Path) -> Self {
        self.bin_dir = self.root.join(bin_dir);
        self
    }

    pub fn with_binary_stem(mut self, stem: impl Into<String>) -> Self {
        self.binary_stem = stem.into();
        self
    }

    pub fn with_link_name(mut self, name: impl Into<String>) -> Self {
        self.link_name = name.into();
        self
    }

    /// The fixed path downstream tooling invokes.
    pub fn link_path(&self) -> PathBuf {
        self.root.join(&self.link_name)
    }

    /// The prebuilt binary shipped for `platform`.
    pub fn variant_path(&self, platform: HostPlatform) -> PathBuf {
        self.bin_dir
            .join(format!("{}.{}", self.binary_stem, platform.as_str()))
    }
}
