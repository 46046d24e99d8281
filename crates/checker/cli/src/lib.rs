//! Keybox Check
//!
//! Command-line front end: configuration, status list loading and report
//! rendering.

pub mod cli;
pub mod config;
pub mod render;
pub mod run;

pub use cli::Cli;
pub use config::Config;
pub use run::run;
