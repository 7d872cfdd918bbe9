use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Global configuration loaded from `~/.config/dlticker/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    /// Persistent log file (None = console only).
    pub log_file: Option<PathBuf>,
    /// Separate file receiving DEBUG records (None = debug output disabled).
    pub debug_log_file: Option<PathBuf>,
    /// Rotate log files once they would reach this many bytes (0 = never rotate).
    pub log_file_max_bytes: u64,
    /// Number of rotated files kept as `<file>.1` .. `<file>.N`.
    pub log_file_backup_count: u32,
    /// Capacity of the in-memory recent log entries buffer.
    pub recent_log_entries: usize,
    /// Number of unforced redraw requests absorbed before a frame is actually built.
    pub redraw_delay: u32,
    /// Interval between periodic redraw requests on the render thread.
    pub tick_interval_ms: u64,
    /// Non-interactive mode: the live frame is never rendered.
    pub daemonize: bool,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            debug_log_file: None,
            log_file_max_bytes: 0,
            log_file_backup_count: 0,
            recent_log_entries: 20,
            redraw_delay: 3,
            tick_interval_ms: 250,
            daemonize: false,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dlticker")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TickerConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = TickerConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit path; missing keys take their defaults.
pub fn load_from(path: &Path) -> Result<TickerConfig> {
    let data = fs::read_to_string(path)?;
    let cfg: TickerConfig = toml::from_str(&data)?;
    Ok(cfg)
}
