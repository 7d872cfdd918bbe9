//! `dlticker config` – show where the config lives and what is in effect.

use anyhow::Result;
use dlticker_core::config::{self, TickerConfig};

pub fn run_config(cfg: &TickerConfig) -> Result<()> {
    println!("Config file: {}", config::config_path()?.display());
    println!("{cfg:#?}");
    Ok(())
}
