//! Symlink operations (create, read, resolve, remove).

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::RealRuntime;
use super::path::{is_path_under, normalize_path};

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn symlink_impl(&self, original: &Path, link: &Path) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::symlink as unix_symlink;
            unix_symlink(original, link).context("Failed to create symlink")?;
        }
        #[cfg(windows)]
        {
            use std::os::windows::fs::{symlink_dir, symlink_file};

            // `is_dir()` on a relative path is relative to CWD; we want it relative to the link's parent.
            let target_path = if original.is_absolute() {
                original.to_path_buf()
            } else {
                link.parent()
                    .context("Failed to get parent directory for symlink")?
                    .join(original)
            };

            if target_path.is_dir() {
                symlink_dir(original, link).context("Failed to create directory symlink")?;
            } else {
                symlink_file(original, link).context("Failed to create file symlink")?;
            }
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn read_link_impl(&self, path: &Path) -> Result<PathBuf> {
        fs::read_link(path).context("Failed to read symlink")
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn resolve_link_impl(&self, path: &Path) -> Result<PathBuf> {
        let target = fs::read_link(path).context("Failed to read symlink")?;
        if target.is_absolute() {
            Ok(target)
        } else {
            let parent = path
                .parent()
                .context("Failed to get parent directory of symlink")?;
            Ok(normalize_path(&parent.join(&target)))
        }
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn is_symlink_impl(&self, path: &Path) -> bool {
        fs::symlink_metadata(path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn remove_symlink_impl(&self, path: &Path) -> Result<()> {
        #[cfg(unix)]
        {
            fs::remove_file(path).context("Failed to remove symlink")?;
        }
        #[cfg(windows)]
        {
            // Directory symlinks need remove_dir, file symlinks need remove_file.
            fs::remove_dir(path)
                .or_else(|_| fs::remove_file(path))
                .context("Failed to remove symlink")?;
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn remove_symlink_if_target_under_impl(
        &self,
        link_path: &Path,
        target_prefix: &Path,
        description: &str,
    ) -> Result<bool> {
        debug!(
            "Validating {} {:?} (expected prefix: {:?})",
            description, link_path, target_prefix
        );

        if !self.is_symlink_impl(link_path) {
            if self.exists_impl(link_path) {
                eprintln!(
                    "Warning: {} {:?} exists but is not a symlink, skipping",
                    description, link_path
                );
            } else {
                debug!("{} {:?} does not exist, skipping", description, link_path);
            }
            return Ok(false);
        }

        let resolved_target = match self.resolve_link_impl(link_path) {
            Ok(target) => target,
            Err(e) => {
                eprintln!(
                    "Warning: {} {:?} is a symlink but cannot read its target: {}, skipping",
                    description, link_path, e
                );
                return Ok(false);
            }
        };

        // A dangling link still counts when its lexical target is under the prefix;
        // otherwise fall back to canonical paths (e.g. macOS /var -> /private/var).
        let under_prefix = is_path_under(&resolved_target, target_prefix) || {
            let canonical_target =
                fs::canonicalize(&resolved_target).unwrap_or_else(|_| resolved_target.clone());
            let canonical_prefix =
                fs::canonicalize(target_prefix).unwrap_or_else(|_| target_prefix.to_path_buf());
            is_path_under(&canonical_target, &canonical_prefix)
        };

        if !under_prefix {
            eprintln!(
                "Warning: {} {:?} points to {:?} which is not within {:?}, skipping removal",
                description, link_path, resolved_target, target_prefix
            );
            return Ok(false);
        }

        debug!("Removing {} {:?}", description, link_path);
        self.remove_symlink_impl(link_path).inspect_err(|e| {
            warn!("Failed to remove {} {:?}: {}", description, link_path, e);
        })?;
        Ok(true)
    }
}
