//! Runtime abstraction for system operations.
//!
//! Everything the installer does to the host goes through [`Runtime`], so the
//! command logic can be exercised against `MockRuntime` in unit tests.
//!
//! # Structure
//!
//! - `path` - Path helpers (normalize, is_path_under, relative_symlink_path)
//! - `env` - Process information (current executable and directory)
//! - `fs` - Plain file operations (exists, remove)
//! - `symlink` - Symlink operations (create, read, resolve, remove)

mod env;
mod fs;
pub mod path;
mod symlink;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use path::{is_path_under, relative_symlink_path};

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // Process
    fn current_exe(&self) -> Result<PathBuf>;
    fn current_dir(&self) -> Result<PathBuf>;

    // File System
    fn exists(&self, path: &Path) -> bool;
    fn remove_file(&self, path: &Path) -> Result<()>;

    // Symlinks
    fn symlink(&self, original: &Path, link: &Path) -> Result<()>;
    fn read_link(&self, path: &Path) -> Result<PathBuf>;

    /// Resolve a symlink's target to a path usable from the current directory
    /// (without recursively resolving symlinks). A relative target is joined
    /// onto the link's parent directory and normalized lexically.
    fn resolve_link(&self, path: &Path) -> Result<PathBuf>;

    /// True for any symlink, including dangling ones.
    fn is_symlink(&self, path: &Path) -> bool;
    fn remove_symlink(&self, path: &Path) -> Result<()>;

    /// Remove a symlink if its target is under the given prefix directory.
    /// The prefix is checked by directory components, not string prefix.
    /// Returns Ok(true) if removed, Ok(false) if skipped, Err if removal failed.
    fn remove_symlink_if_target_under(
        &self,
        link_path: &Path,
        target_prefix: &Path,
        description: &str,
    ) -> Result<bool>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn current_exe(&self) -> Result<PathBuf> {
        self.current_exe_impl()
    }

    fn current_dir(&self) -> Result<PathBuf> {
        self.current_dir_impl()
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.remove_file_impl(path)
    }

    fn symlink(&self, original: &Path, link: &Path) -> Result<()> {
        self.symlink_impl(original, link)
    }

    fn read_link(&self, path: &Path) -> Result<PathBuf> {
        self.read_link_impl(path)
    }

    fn resolve_link(&self, path: &Path) -> Result<PathBuf> {
        self.resolve_link_impl(path)
    }

    fn is_symlink(&self, path: &Path) -> bool {
        self.is_symlink_impl(path)
    }

    fn remove_symlink(&self, path: &Path) -> Result<()> {
        self.remove_symlink_impl(path)
    }

    fn remove_symlink_if_target_under(
        &self,
        link_path: &Path,
        target_prefix: &Path,
        description: &str,
    ) -> Result<bool> {
        self.remove_symlink_if_target_under_impl(link_path, target_prefix, description)
    }
}
