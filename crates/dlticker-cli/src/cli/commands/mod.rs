//! CLI command handlers, one file per command.

mod config;
mod demo;
mod exec;

pub use config::run_config;
pub use demo::{run_demo, DemoOptions, MAX_DEMO_SECONDS};
pub use exec::run_exec;
