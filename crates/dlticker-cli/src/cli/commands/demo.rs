//! `dlticker demo` – simulated workers feeding the live ticker.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use dlticker_core::config::TickerConfig;
use dlticker_core::render::{QueueStatus, SharedQueueStatus};
use dlticker_core::ticker::{DownloadFile, Segment};
use dlticker_core::Logger;
use tokio::task::JoinSet;

const FILE_SIZE: u64 = 64 * 1024 * 1024;
const STEP: Duration = Duration::from_millis(100);
/// Upper bound accepted for `--seconds`.
pub const MAX_DEMO_SECONDS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy)]
pub struct DemoOptions {
    pub segments: usize,
    pub files: usize,
    pub seconds: u64,
    pub daemon: bool,
}

pub async fn run_demo(mut cfg: TickerConfig, opts: DemoOptions) -> Result<()> {
    cfg.daemonize |= opts.daemon;
    let files = opts.files.max(1);
    let segments = opts.segments.max(1);
    let steps = step_count(opts.seconds);

    let status = Arc::new(SharedQueueStatus::new(FILE_SIZE.saturating_mul(files as u64)));
    let (logger, render_loop) = Logger::init(cfg, Arc::clone(&status) as Arc<dyn QueueStatus>)?;
    let logger = Arc::new(logger);
    let render = render_loop.spawn()?;

    logger.stdin_echo_off();
    logger.scroll_begin();
    logger.info(&format!(
        "Starting demo: {files} file(s), {segments} segment(s) each"
    ));

    let mut workers = JoinSet::new();
    for f in 0..files {
        let file = DownloadFile::with_temp_name(format!("download-{}.part", f + 1));
        for s in 0..segments {
            let segment = Segment::new(f as u32 + 1, s as u32 + 1, Arc::clone(&file));
            workers.spawn(simulate_segment(
                Arc::clone(&logger),
                Arc::clone(&status),
                segment,
                steps,
                segments as u64,
            ));
        }
    }

    let interrupted = tokio::select! {
        _ = async { while workers.join_next().await.is_some() {} } => false,
        _ = tokio::signal::ctrl_c() => true,
    };
    workers.abort_all();

    logger.scroll_end();
    render.shutdown();
    logger.stdin_echo_on();
    if interrupted {
        logger.shutdown("Caught interrupt, exiting..");
    } else {
        logger.info("Demo finished");
    }
    Ok(())
}

/// Number of progress steps for a run of `seconds`; never zero.
fn step_count(seconds: u64) -> u32 {
    let millis = seconds.clamp(1, MAX_DEMO_SECONDS) * 1000;
    let steps = millis / STEP.as_millis() as u64;
    u32::try_from(steps).unwrap_or(u32::MAX).max(1)
}

async fn simulate_segment(
    logger: Arc<Logger>,
    status: Arc<SharedQueueStatus>,
    segment: Arc<Segment>,
    steps: u32,
    segments: u64,
) {
    logger.notify_add(Arc::clone(&segment));
    let chunk = FILE_SIZE / segments / u64::from(steps);
    let base_kbps = chunk as f64 / 1024.0 / STEP.as_secs_f64();
    let mut interval = tokio::time::interval(STEP);

    for step in 1..=steps {
        interval.tick().await;
        let jitter = 0.75 + 0.05 * f64::from(step % 10);
        segment.file().update(|p| {
            p.download_percentage = Some(step * 100 / steps);
            p.speed_kbps = Some(base_kbps * jitter * segments as f64);
            if step == steps / 2 && p.filename.is_none() {
                p.filename = p
                    .show_filename
                    .as_deref()
                    .map(|name| name.trim_end_matches(".part").to_string());
            }
        });
        status.consume(chunk);

        if step == steps / 2 && segment.number() == 1 {
            logger.info(&format!(
                "File {}: real filename decoded",
                segment.priority()
            ));
        }
        if step == steps * 3 / 4 && segment.number() == 2 {
            logger.warn(&format!(
                "File {}: segment 2 stalled, reconnecting",
                segment.priority()
            ));
        }
    }
    logger.notify_remove(&segment);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_count_is_clamped_and_never_zero() {
        assert_eq!(step_count(0), 10);
        assert_eq!(step_count(10), 100);
        assert_eq!(step_count(2_147_483_648), step_count(MAX_DEMO_SECONDS));
        assert!(step_count(u64::MAX) > 0);
    }
}
