//! Managing the link from the canonical path to a binary variant.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::InstallError;
use crate::runtime::{Runtime, path::normalize_path, relative_symlink_path};

/// State of the link target as seen by `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkState {
    /// Nothing at the link path
    Missing,
    /// A regular file or directory sits at the link path
    NotSymlink,
    /// Points at the expected variant, which exists
    Current,
    /// Points at the expected variant, which is missing
    Dangling,
    /// Points somewhere other than the expected variant
    Stale,
    /// A symlink whose target cannot be read
    Unresolvable,
}

impl LinkState {
    pub fn reason(&self) -> &'static str {
        match self {
            LinkState::Missing => "not installed",
            LinkState::NotSymlink => "exists but is not a symlink",
            LinkState::Current => "up to date",
            LinkState::Dangling => "points to a missing binary",
            LinkState::Stale => "points to a different binary",
            LinkState::Unresolvable => "cannot resolve target",
        }
    }

    pub fn is_current(&self) -> bool {
        matches!(self, LinkState::Current)
    }
}

/// How the variant path is stored in the link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkStyle {
    /// Relative to the link's directory, so the package can move
    #[default]
    Relative,
    Absolute,
}

/// Result of replacing the link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOutcome {
    pub source: PathBuf,
    pub link: PathBuf,
    /// Path as stored in the symlink
    pub stored: PathBuf,
    /// Whether something was removed from the link path first
    pub replaced: bool,
}

pub struct LinkManager<'a, R: Runtime> {
    runtime: &'a R,
}

impl<'a, R: Runtime> LinkManager<'a, R> {
    pub fn new(runtime: &'a R) -> Self {
        Self { runtime }
    }

    /// Classify what sits at `link`. With no `expected` variant every symlink
    /// is stale.
    pub fn check_link(&self, link: &Path, expected: Option<&Path>) -> LinkState {
        if !self.runtime.is_symlink(link) {
            return if self.runtime.exists(link) {
                LinkState::NotSymlink
            } else {
                LinkState::Missing
            };
        }

        let Ok(target) = self.runtime.resolve_link(link) else {
            return LinkState::Unresolvable;
        };

        match expected {
            Some(expected) if normalize_path(&target) == normalize_path(expected) => {
                // exists() follows the link
                if self.runtime.exists(link) {
                    LinkState::Current
                } else {
                    LinkState::Dangling
                }
            }
            _ => LinkState::Stale,
        }
    }

    /// Remove whatever is at `link`, dangling symlinks included.
    /// Returns whether anything was removed.
    pub fn remove_existing(&self, link: &Path) -> Result<bool, InstallError> {
        if self.runtime.is_symlink(link) {
            log::debug!("Removing existing symlink {:?}", link);
            self.runtime
                .remove_symlink(link)
                .map_err(|e| InstallError::filesystem("remove existing link", link, e))?;
            Ok(true)
        } else if self.runtime.exists(link) {
            log::debug!("Removing existing file {:?}", link);
            self.runtime
                .remove_file(link)
                .map_err(|e| InstallError::filesystem("remove existing file", link, e))?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Create a symlink at `link` pointing to `source`; returns the stored path.
    ///
    /// With [`LinkStyle::Absolute`] a relative `source` is taken from the
    /// current directory.
    pub fn create_link(
        &self,
        source: &Path,
        link: &Path,
        style: LinkStyle,
    ) -> Result<PathBuf, InstallError> {
        let stored = match style {
            LinkStyle::Relative => relative_symlink_path(link, source).unwrap_or_else(|| {
                log::debug!("No relative path from {:?} to {:?}", link, source);
                source.to_path_buf()
            }),
            LinkStyle::Absolute if source.has_root() => source.to_path_buf(),
            LinkStyle::Absolute => {
                // A relative target in a symlink is read from the link's directory
                let cwd = self
                    .runtime
                    .current_dir()
                    .map_err(|e| InstallError::filesystem("resolve variant path", source, e))?;
                normalize_path(&cwd.join(source))
            }
        };

        self.runtime
            .symlink(&stored, link)
            .map_err(|e| InstallError::filesystem("create symlink", link, e))?;
        Ok(stored)
    }

    /// Remove any existing entry at `link`, then link it to `source`.
    pub fn replace_link(
        &self,
        source: &Path,
        link: &Path,
        style: LinkStyle,
    ) -> Result<LinkOutcome, InstallError> {
        let replaced = self.remove_existing(link)?;
        let stored = self.create_link(source, link, style)?;

        Ok(LinkOutcome {
            source: source.to_path_buf(),
            link: link.to_path_buf(),
            stored,
            replaced,
        })
    }
}
