pub mod config;
mod install;
mod status;
mod uninstall;

pub use config::{Config, ConfigOverrides};
pub use install::{install, link_variant};
pub use status::{LinkReport, inspect, status};
pub use uninstall::uninstall;
