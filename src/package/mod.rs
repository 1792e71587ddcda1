//! Package module
//!
//! Describes the on-disk layout of a package shipping prebuilt binary variants
//! and manages the link from the canonical path to one of them.

mod layout;
mod link;

pub use layout::{DEFAULT_BIN_DIR, DEFAULT_BINARY_STEM, DEFAULT_LINK_NAME, PackageLayout};
pub use link::{LinkManager, LinkOutcome, LinkState, LinkStyle};
