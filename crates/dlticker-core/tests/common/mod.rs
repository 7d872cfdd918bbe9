//! Shared helpers for integration tests: an in-memory console and a logger wired to it.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use dlticker_core::config::TickerConfig;
use dlticker_core::render::RenderLoop;
use dlticker_core::sink::Sink;
use dlticker_core::Logger;

/// Console stand-in that records every write.
#[derive(Default)]
pub struct CaptureSink {
    writes: Mutex<Vec<String>>,
}

impl CaptureSink {
    pub fn joined(&self) -> String {
        self.writes.lock().unwrap().concat()
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }
}

impl Sink for CaptureSink {
    fn write_text(&self, text: &str) {
        self.writes.lock().unwrap().push(text.to_string());
    }
}

pub struct Harness {
    pub logger: Arc<Logger>,
    pub render_loop: RenderLoop,
    pub stdout: Arc<CaptureSink>,
    pub stderr: Arc<CaptureSink>,
}

pub fn harness(config: TickerConfig) -> Harness {
    let stdout = Arc::new(CaptureSink::default());
    let stderr = Arc::new(CaptureSink::default());
    let (logger, render_loop) = Logger::builder(config)
        .console(
            Arc::clone(&stdout) as Arc<dyn Sink>,
            Arc::clone(&stderr) as Arc<dyn Sink>,
        )
        .build()
        .expect("build logger");
    Harness {
        logger: Arc::new(logger),
        render_loop,
        stdout,
        stderr,
    }
}

/// Poll `cond` until it holds or five seconds pass.
pub fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    cond()
}
