pub mod commands;
pub mod error;
pub mod package;
pub mod platform;
pub mod runtime;

pub use error::InstallError;
