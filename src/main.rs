use anyhow::Result;
use clap::Parser;
use ppx_install::commands::{self, ConfigOverrides};
use ppx_install::package::LinkStyle;
use std::path::PathBuf;

/// ppx-install - link the prebuilt graphql_ppx binary for this platform
///
/// Selects bin/graphql_ppx.<platform> for the host operating system and
/// links it to the package's `ppx` path, replacing any previous link.
///
/// Examples:
///   ppx-install install                  # Link the variant for this host
///   ppx-install --root . status --check  # Fail unless the link is current
#[derive(Parser, Debug)]
#[command(author, version = env!("PPX_INSTALL_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Package root (defaults to the parent of the executable's directory)
    #[arg(
        long = "root",
        short = 'r',
        env = "PPX_INSTALL_ROOT",
        value_name = "PATH",
        global = true
    )]
    pub root: Option<PathBuf>,

    /// Directory holding the binary variants, relative to the root
    #[arg(
        long = "bin-dir",
        env = "PPX_INSTALL_BIN_DIR",
        value_name = "PATH",
        global = true
    )]
    pub bin_dir: Option<PathBuf>,

    /// File name stem of the binary variants
    #[arg(
        long = "binary-name",
        env = "PPX_INSTALL_BINARY_NAME",
        value_name = "NAME",
        global = true
    )]
    pub binary_name: Option<String>,

    /// Name of the link created under the root
    #[arg(
        long = "link-name",
        env = "PPX_INSTALL_LINK_NAME",
        value_name = "NAME",
        global = true
    )]
    pub link_name: Option<String>,

    /// OS identifier to use instead of the host's (e.g. Linux, Darwin, Windows_NT)
    #[arg(
        long = "os-type",
        env = "PPX_INSTALL_OS_TYPE",
        value_name = "NAME",
        global = true
    )]
    pub os_type: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Link the binary variant for this platform
    Install(InstallArgs),

    /// Show where the link points and whether it is current
    Status(StatusArgs),

    /// Remove the link if it points into the bin directory
    Uninstall,
}

#[derive(clap::Args, Debug)]
pub struct InstallArgs {
    /// Store the absolute variant path in the link instead of a relative one
    #[arg(long)]
    pub absolute: bool,
}

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Exit with an error unless the link is current
    #[arg(long)]
    pub check: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            root: self.root.clone(),
            bin_dir: self.bin_dir.clone(),
            binary_name: self.binary_name.clone(),
            link_name: self.link_name.clone(),
            os_type: self.os_type.clone(),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = ppx_install::runtime::RealRuntime;
    let overrides = cli.overrides();

    match cli.command {
        Commands::Install(args) => {
            let style = if args.absolute {
                LinkStyle::Absolute
            } else {
                LinkStyle::Relative
            };
            commands::install(runtime, overrides, style)?
        }
        Commands::Status(args) => commands::status(runtime, overrides, args.json, args.check)?,
        Commands::Uninstall => commands::uninstall(runtime, overrides)?,
    }
    Ok(())
}
