//! Builds the live ticker frame and writes it when it changes.
//!
//! Frame layout (cursor ends on the aggregate line):
//!
//! ```text
//! <header lines, each ending ESC[K \n>        printed once, scroll up with the terminal
//! [1] name - 42% @ 123.4KB/s ESC[K \n\r        one line per high-water-mark slot
//! [2] ESC[K \n\r                              placeholder for an idle slot
//! [Total] 123.4KB/s, 700 MB queued, ETA: 01:02:03 ESC[K
//! ```
//!
//! The next frame moves the cursor up over the slot lines only, so earlier
//! headers stay on screen above the ticker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::ansi::{self, KILL_LINE, RESET};
use crate::text::{pretty_eta, rtruncate, wrap_to_width};
use crate::ticker::{DownloadFile, Segment, TickerRegistry};

use super::status::QueueStatus;

/// Maximum columns of a header line.
pub const HEADER_WIDTH: usize = 80;
/// Room left for a file name once label and progress suffix are accounted for.
pub const NAME_WIDTH: usize = 57;

/// Where finished frames go. The facility routes them through the SCROLL level.
pub trait FrameOutput: Send + Sync {
    fn emit_scroll(&self, text: &str);
}

/// Render-thread state of the live ticker. Not shared with worker threads.
pub struct FrameRenderer {
    registry: Arc<TickerRegistry>,
    status: Arc<dyn QueueStatus>,
    output: Arc<dyn FrameOutput>,
    shutting_down: Arc<AtomicBool>,
    daemonize: bool,
    delay: u32,
    wait: u32,
    pending_headers: Vec<String>,
    previous: Option<String>,
    /// Slot lines (line breaks after the headers) written by the previous frame.
    previous_slot_lines: usize,
    started: bool,
    killed_history: bool,
}

impl FrameRenderer {
    pub fn new(
        registry: Arc<TickerRegistry>,
        status: Arc<dyn QueueStatus>,
        output: Arc<dyn FrameOutput>,
        shutting_down: Arc<AtomicBool>,
        delay: u32,
        daemonize: bool,
    ) -> Self {
        Self {
            registry,
            status,
            output,
            shutting_down,
            daemonize,
            delay,
            wait: 0,
            pending_headers: Vec::new(),
            previous: None,
            previous_slot_lines: 0,
            started: false,
            killed_history: false,
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn pending_headers(&self) -> &[String] {
        &self.pending_headers
    }

    /// Start a scroll session: the next frame is drawn fresh, without erasing.
    pub fn begin(&mut self) {
        self.started = true;
        self.killed_history = false;
        self.previous = None;
        self.previous_slot_lines = 0;
        self.wait = 0;
    }

    /// Queue a message to print above the ticker and redraw right away.
    /// Every line is wrapped to [`HEADER_WIDTH`] columns.
    pub fn scroll_header(&mut self, message: &str) {
        for line in message.split('\n') {
            self.pending_headers.push(wrap_to_width(line, HEADER_WIDTH));
        }
        if self.shutting_down.load(Ordering::Relaxed) {
            return;
        }
        self.request_redraw(true);
    }

    /// Redraw the ticker. Unforced requests are throttled and dropped when the
    /// frame has not changed.
    pub fn request_redraw(&mut self, force: bool) {
        if self.daemonize {
            return;
        }
        if !self.started {
            self.flush_orphan_headers();
            return;
        }

        if !force {
            self.wait += 1;
            if self.wait < self.delay {
                return;
            }
            self.wait = 0;
        }

        let mut log_now = force;
        let mut frame = String::new();
        if self.previous.is_some() {
            frame.push('\r');
            if self.previous_slot_lines > 0 {
                frame.push_str(&ansi::cursor_up(self.previous_slot_lines));
            }
        } else {
            log_now = true;
        }

        for header in self.pending_headers.drain(..) {
            frame.push_str(&header.replace('\n', &format!("{KILL_LINE}\n")));
            frame.push_str(KILL_LINE);
            frame.push('\n');
        }

        let snapshot = self.registry.snapshot();
        let slots = snapshot.high_water_mark.max(snapshot.segments.len());
        let wide = slots > 9;

        let mut last: Option<&Arc<Segment>> = None;
        for (i, segment) in snapshot.segments.iter().enumerate() {
            let continuation = last.is_some_and(|prev| prev.same_file(segment));
            push_segment_line(&mut frame, &label(i + 1, wide), segment, continuation);
            frame.push_str("\n\r");
            last = Some(segment);
        }
        for fill in snapshot.segments.len() + 1..=slots {
            frame.push_str(&connection_prefix(&label(fill, wide)));
            frame.push_str(KILL_LINE);
            frame.push_str("\n\r");
        }

        self.push_total_line(&mut frame, &snapshot.segments);

        if log_now || self.previous.as_deref() != Some(frame.as_str()) {
            self.output.emit_scroll(&frame);
            self.previous = Some(frame);
            self.previous_slot_lines = slots;
        }
    }

    /// Wipe the ticker off the screen and end the session. Only the first call
    /// after a session start writes anything.
    pub fn kill_history(&mut self) {
        if self.started && !self.killed_history {
            let n = self.registry.high_water_mark() + 1;
            let up = ansi::cursor_up(n);
            let mut msg = format!("\r{up}");
            for _ in 0..n {
                msg.push_str("\n\r");
                msg.push_str(KILL_LINE);
            }
            msg.push('\r');
            msg.push_str(&up);
            if !self.daemonize {
                self.output.emit_scroll(&msg);
            }
            self.killed_history = true;
            self.started = false;
        }
        self.registry.clear_history();
        self.previous = None;
        self.previous_slot_lines = 0;
        self.wait = 0;
        self.flush_orphan_headers();
    }

    /// Headers that arrive outside a session are printed as plain lines.
    fn flush_orphan_headers(&mut self) {
        if self.pending_headers.is_empty() {
            return;
        }
        let mut text = String::new();
        for header in self.pending_headers.drain(..) {
            text.push_str(&header);
            text.push('\n');
        }
        if !self.daemonize {
            self.output.emit_scroll(&text);
        }
    }

    fn push_total_line(&self, frame: &mut String, segments: &[Arc<Segment>]) {
        let total_speed = self
            .status
            .total_speed_kbps()
            .unwrap_or_else(|| sum_file_speeds(segments));
        let queued = self.status.queued_bytes();
        let eta = if total_speed > 0.0 && total_speed.is_finite() {
            pretty_eta((queued as f64 / 1024.0) / total_speed)
        } else {
            pretty_eta(0.0)
        };
        let paused = if self.status.is_paused() {
            format!("{} [Paused]{RESET}", ansi::F_DCYAN)
        } else {
            String::new()
        };
        frame.push_str(&format!(
            "{}{} {:.1}KB/s{RESET}, {}{} MB{RESET} queued, ETA: {}{}{RESET}{}{KILL_LINE}",
            connection_prefix("Total"),
            ansi::F_DRED,
            total_speed,
            ansi::F_DGREEN,
            queued / 1024 / 1024,
            ansi::F_YELLOW,
            eta,
            paused,
        ));
    }
}

fn label(index: usize, wide: bool) -> String {
    if wide {
        format!("{index:02}")
    } else {
        index.to_string()
    }
}

fn connection_prefix(id: &str) -> String {
    format!("{0}[{RESET}{id}{0}]{RESET}", ansi::F_DBLUE)
}

fn push_segment_line(frame: &mut String, id: &str, segment: &Segment, continuation: bool) {
    let progress = segment.file().snapshot();
    frame.push_str(&connection_prefix(id));
    let Some(name) = progress.show_filename.as_deref() else {
        frame.push_str(KILL_LINE);
        return;
    };
    let name = rtruncate(name, NAME_WIDTH);
    match (continuation, progress.download_percentage, progress.speed_kbps) {
        (false, Some(pct), Some(speed)) => frame.push_str(&format!(
            " {name} - {}{pct:2}%{RESET}{} @ {RESET}{}{speed:.1}KB/s{KILL_LINE}",
            ansi::F_DGREEN,
            ansi::F_DBLUE,
            ansi::F_DRED,
        )),
        _ => frame.push_str(&format!(" {name}{KILL_LINE}")),
    }
}

/// Sum of speeds, counting each file once however many segments it has on screen.
fn sum_file_speeds(segments: &[Arc<Segment>]) -> f64 {
    let mut seen: Vec<&Arc<DownloadFile>> = Vec::new();
    let mut total = 0.0;
    for segment in segments {
        let file = segment.file();
        if seen.iter().any(|f| Arc::ptr_eq(f, file)) {
            continue;
        }
        seen.push(file);
        if let Some(speed) = file.snapshot().speed_kbps {
            if speed.is_finite() && speed > 0.0 {
                total += speed;
            }
        }
    }
    total
}

#[cfg(test)]
mod tests;
