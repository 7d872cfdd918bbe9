//! Scroll-aware console handler and the scroll state it shares.
//!
//! While a scroll session is active the console belongs to the live frame:
//! ordinary records are not written directly but handed to the render thread,
//! which prints them as headers above the ticker on its next redraw.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, TryLockError, Weak};
use std::thread::ThreadId;

use tokio::sync::mpsc::UnboundedSender;

use crate::level::{Level, LevelFilter, LevelRegistry};
use crate::record::LogRecord;
use crate::render::{FrameRenderer, RenderCommand};
use crate::sink::Sink;

use super::Handler;

/// Scroll state shared by every scrollable handler of one facility, plus the
/// route to the render thread.
pub struct ScrollContext {
    scrolling: Mutex<bool>,
    daemonize: bool,
    shutting_down: Arc<AtomicBool>,
    commands: UnboundedSender<RenderCommand>,
    render_thread: OnceLock<ThreadId>,
    renderer: OnceLock<Weak<Mutex<FrameRenderer>>>,
}

impl ScrollContext {
    pub(crate) fn new(
        commands: UnboundedSender<RenderCommand>,
        shutting_down: Arc<AtomicBool>,
        daemonize: bool,
    ) -> Self {
        Self {
            scrolling: Mutex::new(false),
            daemonize,
            shutting_down,
            commands,
            render_thread: OnceLock::new(),
            renderer: OnceLock::new(),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, bool> {
        self.scrolling.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_scrolling(&self) -> bool {
        *self.lock_state()
    }

    pub fn is_daemon(&self) -> bool {
        self.daemonize
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::Relaxed)
    }

    pub(crate) fn set_shutting_down(&self) {
        self.shutting_down.store(true, Ordering::Relaxed);
    }

    /// Run `f` with the scroll lock held; `f` sees and may change the flag.
    /// Direct console writes wait for the lock, so `f` must not log through
    /// the same facility.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut bool) -> R) -> R {
        let mut scrolling = self.lock_state();
        f(&mut scrolling)
    }

    /// Enter scroll mode: ordinary records become headers from now on.
    pub fn begin(&self) {
        self.with_lock(|scrolling| {
            *scrolling = true;
            self.send(RenderCommand::Begin);
        });
    }

    /// Leave scroll mode and wipe the ticker.
    ///
    /// On the render thread this happens before returning. From other threads
    /// the flag stays set until the render thread has erased the frame, so
    /// records logged in between still go through the header queue.
    pub fn end(&self) {
        if !self.dispatch(RenderCommand::KillHistory) {
            self.with_lock(|scrolling| *scrolling = false);
        }
    }

    pub fn is_render_thread(&self) -> bool {
        self.render_thread.get() == Some(&std::thread::current().id())
    }

    pub(crate) fn bind_render_thread(&self, renderer: &Arc<Mutex<FrameRenderer>>) {
        let id = std::thread::current().id();
        if self.render_thread.set(id).is_err() && !self.is_render_thread() {
            tracing::warn!("render thread already bound; ignoring rebind");
            return;
        }
        if self.renderer.set(Arc::downgrade(renderer)).is_err() {
            tracing::debug!("renderer already bound; keeping the first one");
        }
    }

    /// Run `command` on the render thread: inline when already there, otherwise
    /// queued without blocking the caller. Returns false if the render loop is
    /// gone and the command was dropped.
    pub fn dispatch(&self, command: RenderCommand) -> bool {
        if self.is_render_thread() {
            if let Some(renderer) = self.renderer.get().and_then(Weak::upgrade) {
                match renderer.try_lock() {
                    Ok(mut guard) => {
                        command.apply(&mut guard, self);
                        return true;
                    }
                    Err(TryLockError::Poisoned(poisoned)) => {
                        command.apply(&mut poisoned.into_inner(), self);
                        return true;
                    }
                    // Renderer is busy further up this thread's stack.
                    Err(TryLockError::WouldBlock) => {}
                }
            }
        }
        self.send(command)
    }

    fn send(&self, command: RenderCommand) -> bool {
        if self.commands.send(command).is_err() {
            tracing::debug!("render loop gone; dropped render command");
            return false;
        }
        true
    }
}

/// Console handler that knows about scroll sessions.
pub struct ScrollableHandler {
    sink: Arc<dyn Sink>,
    filter: LevelFilter,
    context: Arc<ScrollContext>,
}

impl ScrollableHandler {
    pub fn new(sink: Arc<dyn Sink>, filter: LevelFilter, context: Arc<ScrollContext>) -> Self {
        Self {
            sink,
            filter,
            context,
        }
    }

    fn scroll_header(&self, message: &str) {
        let header = message.trim_end().to_string();
        self.context.dispatch(RenderCommand::Header(header));
    }
}

impl Handler for ScrollableHandler {
    fn handle(&self, record: &LogRecord, _levels: &LevelRegistry) {
        if !self.filter.accepts(record.level()) {
            return;
        }
        match record.level() {
            Level::SCROLL => {
                if !self.context.is_daemon() {
                    self.sink.write_text(record.message());
                }
            }
            Level::SHUTDOWN => {
                self.sink
                    .write_text(&format!("\n\n\n{}\n", record.message()));
            }
            _ => {
                // The check and a direct write form one step under the scroll
                // lock; a session cannot start between them.
                let scrolling = self.context.lock_state();
                if *scrolling && !self.context.is_daemon() {
                    drop(scrolling);
                    self.scroll_header(record.message());
                } else {
                    self.sink.write_text(record.message());
                }
            }
        }
    }
}
