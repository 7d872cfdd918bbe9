//! The render thread: the only place frames are built and written.
//!
//! Other threads never touch the renderer; they send [`RenderCommand`]s that
//! the loop drains in arrival order on each poll.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::Duration;

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::error::TickerError;
use crate::handler::ScrollContext;

use super::frame::FrameRenderer;

/// Work marshalled onto the render thread.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    Begin,
    Header(String),
    Redraw { force: bool },
    KillHistory,
}

impl RenderCommand {
    pub(crate) fn apply(self, renderer: &mut FrameRenderer, context: &ScrollContext) {
        match self {
            RenderCommand::Begin => renderer.begin(),
            RenderCommand::Header(message) => renderer.scroll_header(&message),
            RenderCommand::Redraw { force } => renderer.request_redraw(force),
            // The flag drops only once the frame is gone, so nothing is written
            // directly while it is still on screen.
            RenderCommand::KillHistory => context.with_lock(|scrolling| {
                renderer.kill_history();
                *scrolling = false;
            }),
        }
    }
}

fn lock_renderer(renderer: &Mutex<FrameRenderer>) -> MutexGuard<'_, FrameRenderer> {
    renderer.lock().unwrap_or_else(|e| e.into_inner())
}

/// Owns the receiving end of the command channel and the renderer.
pub struct RenderLoop {
    commands: UnboundedReceiver<RenderCommand>,
    renderer: Arc<Mutex<FrameRenderer>>,
    context: Arc<ScrollContext>,
    tick: Duration,
}

impl RenderLoop {
    pub(crate) fn new(
        commands: UnboundedReceiver<RenderCommand>,
        renderer: FrameRenderer,
        context: Arc<ScrollContext>,
        tick: Duration,
    ) -> Self {
        Self {
            commands,
            renderer: Arc::new(Mutex::new(renderer)),
            context,
            tick,
        }
    }

    /// Make the calling thread the render thread. Header forwarding from this
    /// thread then runs inline instead of going through the channel.
    pub fn bind_current_thread(&self) {
        self.context.bind_render_thread(&self.renderer);
    }

    /// Apply every queued command without blocking. Returns how many ran.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.commands.try_recv() {
                Ok(command) => {
                    command.apply(&mut lock_renderer(&self.renderer), &self.context);
                    applied += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        applied
    }

    /// Periodic, unforced redraw request (subject to throttling).
    pub fn tick(&mut self) {
        lock_renderer(&self.renderer).request_redraw(false);
    }

    /// Direct access to the renderer from the render thread.
    pub fn renderer(&self) -> MutexGuard<'_, FrameRenderer> {
        lock_renderer(&self.renderer)
    }

    /// Run the loop on a dedicated thread: poll, tick, sleep.
    pub fn spawn(mut self) -> Result<RenderHandle, TickerError> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let join = std::thread::Builder::new()
            .name("dlticker-render".to_string())
            .spawn(move || {
                self.bind_current_thread();
                tracing::debug!(tick_ms = self.tick.as_millis() as u64, "render thread started");
                while !stop_flag.load(Ordering::Acquire) {
                    self.poll();
                    self.tick();
                    std::thread::sleep(self.tick);
                }
                self.poll();
                tracing::debug!("render thread stopped");
            })
            .map_err(TickerError::RenderThread)?;
        Ok(RenderHandle {
            stop,
            join: Some(join),
        })
    }
}

/// Handle to a spawned render thread; stopping drains outstanding commands first.
pub struct RenderHandle {
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl RenderHandle {
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                tracing::warn!("render thread panicked");
            }
        }
    }
}

impl Drop for RenderHandle {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}
