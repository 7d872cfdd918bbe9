//! Size-rotated log file sink.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::Sink;
use crate::error::TickerError;

struct FileState {
    file: Option<File>,
    size: u64,
}

/// Appends to `path`; once a write would take the file to `max_bytes`, the file
/// is rotated to `path.1` (shifting `path.1` to `path.2`, and so on up to
/// `backup_count`) before writing. `max_bytes == 0` disables rotation.
pub struct RotatingFileSink {
    path: PathBuf,
    max_bytes: u64,
    backup_count: u32,
    state: Mutex<FileState>,
}

impl RotatingFileSink {
    /// Open (creating parent directories) for appending.
    pub fn open(path: &Path, max_bytes: u64, backup_count: u32) -> Result<Self, TickerError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| TickerError::LogDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let file = open_append(path).map_err(|source| TickerError::LogFile {
            path: path.to_path_buf(),
            source,
        })?;
        let size = file.metadata().map(|m| m.len()).unwrap_or(0);
        Ok(Self {
            path: path.to_path_buf(),
            max_bytes,
            backup_count,
            state: Mutex::new(FileState {
                file: Some(file),
                size,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn backup_path(&self, n: u32) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(".{n}"));
        PathBuf::from(name)
    }

    fn rotate(&self, state: &mut FileState) -> io::Result<()> {
        state.file = None;
        if self.backup_count > 0 {
            for i in (1..self.backup_count).rev() {
                let src = self.backup_path(i);
                if src.exists() {
                    fs::rename(&src, self.backup_path(i + 1))?;
                }
            }
            fs::rename(&self.path, self.backup_path(1))?;
            state.file = Some(open_append(&self.path)?);
        } else {
            state.file = Some(File::create(&self.path)?);
        }
        state.size = 0;
        Ok(())
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl Sink for RotatingFileSink {
    fn write_text(&self, text: &str) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let pending = text.len() as u64;
        if self.max_bytes > 0 && state.size + pending >= self.max_bytes {
            if let Err(e) = self.rotate(&mut state) {
                tracing::warn!(path = %self.path.display(), error = %e, "log rotation failed; continuing without rotating");
            }
        }
        if state.file.is_none() {
            match open_append(&self.path) {
                Ok(file) => {
                    state.size = file.metadata().map(|m| m.len()).unwrap_or(0);
                    state.file = Some(file);
                }
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "dropped log write");
                    return;
                }
            }
        }
        let result = match state.file.as_mut() {
            Some(file) => file.write_all(text.as_bytes()).and_then(|()| file.flush()),
            None => return,
        };
        match result {
            Ok(()) => state.size += pending,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "dropped log write")
            }
        }
    }
}
