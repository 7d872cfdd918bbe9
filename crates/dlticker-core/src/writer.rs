//! `io::Write` adapter that turns written bytes into log records.

use std::io;
use std::sync::Arc;

use crate::facility::Logger;
use crate::level::Level;

/// Buffers bytes and logs each complete line (newline included) at one level.
/// A trailing partial line is logged on flush or drop.
pub struct LogWriter {
    logger: Arc<Logger>,
    level: Level,
    pending: Vec<u8>,
}

impl LogWriter {
    pub fn new(logger: Arc<Logger>, level: Level) -> Self {
        Self {
            logger,
            level,
            pending: Vec::new(),
        }
    }

    fn emit(&self, bytes: &[u8]) {
        self.logger.log(self.level, &String::from_utf8_lossy(bytes));
    }
}

impl io::Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.emit(&line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.emit(&rest);
        }
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}
