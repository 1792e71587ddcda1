//! Path helpers for link bookkeeping. None of these touch the filesystem.

use std::path::{Component, Path, PathBuf};

/// Resolve `.` and `..` components without consulting the filesystem.
/// A `..` that would climb past the start of the path is kept.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    path.components().fold(PathBuf::new(), |mut acc, component| {
        match component {
            Component::CurDir => {}
            Component::ParentDir if acc.pop() => {}
            other => acc.push(other),
        }
        acc
    })
}

/// Whether `path` lies inside `dir` once both are normalized.
///
/// `/pkg/bin/../../etc/passwd` is NOT under `/pkg/bin`, and `/pkg/binaries/x`
/// is not under `/pkg/bin` either.
pub fn is_path_under(path: &Path, dir: &Path) -> bool {
    // starts_with compares whole components
    normalize_path(path).starts_with(normalize_path(dir))
}

/// What a symlink at `from_link` must store to reach `to_target`.
///
/// For a link at `/pkg/ppx` and a variant at `/pkg/bin/graphql_ppx.linux`
/// this returns `bin/graphql_ppx.linux`. `None` when the two paths share no
/// base (one absolute and one relative, or different Windows drives).
pub fn relative_symlink_path(from_link: &Path, to_target: &Path) -> Option<PathBuf> {
    let link_dir = from_link.parent()?;
    pathdiff::diff_paths(to_target, link_dir).filter(|stored| stored.is_relative())
}
