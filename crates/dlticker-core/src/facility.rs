//! The logging facility: leveled logging, scroll sessions and ticker notifications.
//!
//! One [`Logger`] owns the handler set, the scroll context and the ticker
//! registry. Building it also yields the [`RenderLoop`] that must be driven on
//! exactly one thread (see [`RenderLoop::spawn`]).

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use tokio::sync::mpsc::unbounded_channel;

use crate::config::TickerConfig;
use crate::error::TickerError;
use crate::handler::{FileFormat, FileHandler, Handler, ScrollContext, ScrollableHandler};
use crate::level::{Level, LevelFilter, LevelRegistry};
use crate::recent::RecentLogEntries;
use crate::record::LogRecord;
use crate::render::{
    FrameOutput, FrameRenderer, QueueStatus, RenderCommand, RenderLoop, SharedQueueStatus,
};
use crate::sink::{RotatingFileSink, Sink, StreamSink};
use crate::ticker::{Segment, TickerRegistry};

/// Fans records out to every handler.
///
/// Dispatch works on snapshots of the level table and handler list, so a
/// handler may log again (the renderer does) without holding these locks.
pub struct Dispatcher {
    levels: RwLock<Arc<LevelRegistry>>,
    handlers: RwLock<Arc<Vec<Arc<dyn Handler>>>>,
}

impl Dispatcher {
    fn new(levels: LevelRegistry) -> Self {
        Self {
            levels: RwLock::new(Arc::new(levels)),
            handlers: RwLock::new(Arc::new(Vec::new())),
        }
    }

    pub fn dispatch(&self, record: &LogRecord) {
        let levels = Arc::clone(&self.levels.read().unwrap_or_else(|e| e.into_inner()));
        let handlers = Arc::clone(&self.handlers.read().unwrap_or_else(|e| e.into_inner()));
        for handler in handlers.iter() {
            handler.handle(record, &levels);
        }
    }

    fn add_handler(&self, handler: Arc<dyn Handler>) {
        let mut handlers = self.handlers.write().unwrap_or_else(|e| e.into_inner());
        Arc::make_mut(&mut handlers).push(handler);
    }

    fn register_level(&self, name: &str, level: Level) {
        let mut levels = self.levels.write().unwrap_or_else(|e| e.into_inner());
        Arc::make_mut(&mut levels).register(name, level);
    }
}

impl FrameOutput for Dispatcher {
    fn emit_scroll(&self, text: &str) {
        self.dispatch(&LogRecord::new(Level::SCROLL, text));
    }
}

/// Builder for [`Logger`]; defaults to stdout/stderr and the standard levels.
pub struct LoggerBuilder {
    config: TickerConfig,
    levels: LevelRegistry,
    status: Option<Arc<dyn QueueStatus>>,
    stdout: Option<Arc<dyn Sink>>,
    stderr: Option<Arc<dyn Sink>>,
}

impl LoggerBuilder {
    pub fn levels(mut self, levels: LevelRegistry) -> Self {
        self.levels = levels;
        self
    }

    pub fn status(mut self, status: Arc<dyn QueueStatus>) -> Self {
        self.status = Some(status);
        self
    }

    /// Replace the console streams (warning-and-below, error-and-above).
    pub fn console(mut self, stdout: Arc<dyn Sink>, stderr: Arc<dyn Sink>) -> Self {
        self.stdout = Some(stdout);
        self.stderr = Some(stderr);
        self
    }

    pub fn build(self) -> Result<(Logger, RenderLoop), TickerError> {
        self.levels.require_control_levels()?;

        let (tx, rx) = unbounded_channel();
        let shutting_down = Arc::new(AtomicBool::new(false));
        let context = Arc::new(ScrollContext::new(
            tx,
            Arc::clone(&shutting_down),
            self.config.daemonize,
        ));
        let registry = Arc::new(TickerRegistry::new());
        let dispatcher = Arc::new(Dispatcher::new(self.levels));

        let stdout = self
            .stdout
            .unwrap_or_else(|| Arc::new(StreamSink::stdout()));
        let stderr = self
            .stderr
            .unwrap_or_else(|| Arc::new(StreamSink::stderr()));
        dispatcher.add_handler(Arc::new(ScrollableHandler::new(
            stdout,
            LevelFilter::at_least(Level::INFO)
                .at_most(Level::WARNING)
                .with_control(&[Level::SCROLL, Level::SHUTDOWN, Level::NOLOGFILE]),
            Arc::clone(&context),
        )));
        dispatcher.add_handler(Arc::new(ScrollableHandler::new(
            stderr,
            LevelFilter::at_least(Level::ERROR),
            Arc::clone(&context),
        )));

        if let Some(path) = &self.config.log_file {
            let sink = RotatingFileSink::open(
                path,
                self.config.log_file_max_bytes,
                self.config.log_file_backup_count,
            )?;
            tracing::debug!(path = %path.display(), "log file enabled");
            dispatcher.add_handler(Arc::new(FileHandler::new(
                Arc::new(sink),
                LevelFilter::at_least(Level::INFO).with_control(&[Level::LOGFILE, Level::SHUTDOWN]),
                FileFormat::TimestampLevel,
            )));
        }
        if let Some(path) = &self.config.debug_log_file {
            let sink = RotatingFileSink::open(
                path,
                self.config.log_file_max_bytes,
                self.config.log_file_backup_count,
            )?;
            tracing::debug!(path = %path.display(), "debug log file enabled");
            dispatcher.add_handler(Arc::new(FileHandler::new(
                Arc::new(sink),
                LevelFilter::at_least(Level::DEBUG).at_most(Level::DEBUG),
                FileFormat::Timestamp,
            )));
        }

        let status = self
            .status
            .unwrap_or_else(|| Arc::new(SharedQueueStatus::default()));
        let renderer = FrameRenderer::new(
            Arc::clone(&registry),
            status,
            Arc::clone(&dispatcher) as Arc<dyn FrameOutput>,
            shutting_down,
            self.config.redraw_delay,
            self.config.daemonize,
        );
        let render_loop = RenderLoop::new(
            rx,
            renderer,
            Arc::clone(&context),
            Duration::from_millis(self.config.tick_interval_ms.max(1)),
        );

        let logger = Logger {
            recent: Mutex::new(RecentLogEntries::new(self.config.recent_log_entries)),
            config: self.config,
            dispatcher,
            context,
            registry,
        };
        Ok((logger, render_loop))
    }
}

/// Leveled logging that cooperates with the live download ticker.
/// Safe to share across worker threads.
pub struct Logger {
    config: TickerConfig,
    dispatcher: Arc<Dispatcher>,
    context: Arc<ScrollContext>,
    registry: Arc<TickerRegistry>,
    recent: Mutex<RecentLogEntries>,
}

impl Logger {
    pub fn builder(config: TickerConfig) -> LoggerBuilder {
        LoggerBuilder {
            config,
            levels: LevelRegistry::with_defaults(),
            status: None,
            stdout: None,
            stderr: None,
        }
    }

    /// Console logging plus the log files named in `config`.
    pub fn init(
        config: TickerConfig,
        status: Arc<dyn QueueStatus>,
    ) -> Result<(Logger, RenderLoop), TickerError> {
        Self::builder(config).status(status).build()
    }

    pub fn config(&self) -> &TickerConfig {
        &self.config
    }

    /// Emit `message` verbatim at `level`; include the trailing newline yourself.
    pub fn log(&self, level: Level, message: &str) {
        if level != Level::SCROLL && level != Level::DEBUG {
            self.recent
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .append(level, message.trim_end());
        }
        self.dispatcher.dispatch(&LogRecord::new(level, message));
    }

    pub fn debug(&self, message: &str) {
        self.log(Level::DEBUG, &format!("{message}\n"));
    }

    pub fn info(&self, message: &str) {
        self.log(Level::INFO, &format!("{message}\n"));
    }

    pub fn warn(&self, message: &str) {
        self.log(Level::WARNING, &format!("{message}\n"));
    }

    pub fn error(&self, message: &str) {
        self.log(Level::ERROR, &format!("{message}\n"));
    }

    pub fn critical(&self, message: &str) {
        self.log(Level::CRITICAL, &format!("{message}\n"));
    }

    /// Raw frame content, written as-is.
    pub fn scroll(&self, text: &str) {
        self.log(Level::SCROLL, text);
    }

    /// Final message; also stops header-triggered redraws.
    pub fn shutdown(&self, message: &str) {
        self.begin_shutdown();
        self.log(Level::SHUTDOWN, message);
    }

    /// Log file only.
    pub fn logfile(&self, message: &str) {
        self.log(Level::LOGFILE, &format!("{message}\n"));
    }

    /// Console only.
    pub fn nologfile(&self, message: &str) {
        self.log(Level::NOLOGFILE, &format!("{message}\n"));
    }

    pub fn add_handler(&self, handler: Arc<dyn Handler>) {
        self.dispatcher.add_handler(handler);
    }

    /// Name a level for formatters; an existing name is silently replaced.
    pub fn register_level(&self, name: &str, level: Level) {
        self.dispatcher.register_level(name, level);
    }

    pub fn scroll_begin(&self) {
        self.context.begin();
    }

    /// End the session. The scroll flag clears once the render thread has
    /// wiped the frame; until then records keep going through the header queue.
    pub fn scroll_end(&self) {
        self.context.end();
    }

    pub fn is_scrolling(&self) -> bool {
        self.context.is_scrolling()
    }

    /// Stop echoing keystrokes over the live frame. No-op in daemon mode.
    pub fn stdin_echo_off(&self) {
        if !self.config.daemonize {
            crate::term::set_stdin_echo(false);
        }
    }

    pub fn stdin_echo_on(&self) {
        if !self.config.daemonize {
            crate::term::set_stdin_echo(true);
        }
    }

    /// Run `f` while no handler can change or act on the scroll state.
    /// Direct console writes block meanwhile, so `f` must not log here.
    pub fn with_scroll_lock<R>(&self, f: impl FnOnce() -> R) -> R {
        self.context.with_lock(|_| f())
    }

    pub fn begin_shutdown(&self) {
        self.context.set_shutting_down();
    }

    pub fn notify_add(&self, segment: Arc<Segment>) {
        self.registry.add(segment);
    }

    pub fn notify_remove(&self, segment: &Segment) {
        self.registry.remove(segment);
    }

    /// Ask the render thread for a redraw; never blocks.
    pub fn request_redraw(&self, force: bool) {
        self.context.dispatch(RenderCommand::Redraw { force });
    }

    pub fn registry(&self) -> &Arc<TickerRegistry> {
        &self.registry
    }

    pub fn context(&self) -> &Arc<ScrollContext> {
        &self.context
    }

    /// Copy of the recent entries, oldest first.
    pub fn recent_entries(&self) -> Vec<(Level, String)> {
        self.recent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(level, msg)| (level, msg.to_string()))
            .collect()
    }
}
