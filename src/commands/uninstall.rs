use anyhow::{Context, Result};
use log::debug;

use crate::runtime::Runtime;

use super::config::{Config, ConfigOverrides};

/// Remove the link, but only when it points into the package's bin directory.
#[tracing::instrument(skip(runtime, overrides))]
pub fn uninstall<R: Runtime>(runtime: R, overrides: ConfigOverrides) -> Result<()> {
    let config = Config::load(&runtime, overrides)?;
    let link = config.layout.link_path();
    debug!("Uninstalling {:?} (bin dir {:?})", link, config.layout.bin_dir);

    let removed = runtime
        .remove_symlink_if_target_under(&link, &config.layout.bin_dir, "binary link")
        .with_context(|| format!("Failed to remove {}", link.display()))?;

    if removed {
        println!("Removed {}", link.display());
    } else {
        println!("Nothing removed at {}", link.display());
    }
    Ok(())
}
