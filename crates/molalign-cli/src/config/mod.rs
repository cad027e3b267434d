//! Layered configuration: built-in defaults, an optional TOML file, `--set`
//! overrides and finally explicit command-line flags.

mod builder;
mod defaults;
mod file;
mod models;

pub use builder::build_config;
