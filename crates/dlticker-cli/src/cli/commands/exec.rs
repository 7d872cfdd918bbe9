//! `dlticker exec` – run a child process under the ticker.

use std::io::Write;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use dlticker_core::config::TickerConfig;
use dlticker_core::render::SharedQueueStatus;
use dlticker_core::ticker::{DownloadFile, FileProgress, Segment};
use dlticker_core::writer::LogWriter;
use dlticker_core::{Level, Logger};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

pub async fn run_exec(cfg: TickerConfig, cmd: &[String]) -> Result<()> {
    let (program, args) = cmd.split_first().context("no command given")?;

    let (logger, render_loop) = Logger::init(cfg, Arc::new(SharedQueueStatus::default()))?;
    let logger = Arc::new(logger);
    let render = render_loop.spawn()?;

    let segment = Segment::new(
        1,
        1,
        DownloadFile::new(FileProgress {
            show_filename: Some(cmd.join(" ")),
            ..FileProgress::default()
        }),
    );
    logger.stdin_echo_off();
    logger.scroll_begin();
    logger.notify_add(Arc::clone(&segment));

    let result = stream_child(&logger, &segment, program, args).await;

    logger.notify_remove(&segment);
    logger.scroll_end();
    render.shutdown();
    logger.stdin_echo_on();

    let status = result?;
    logger.info(&format!("{program} exited with {status}"));
    if !status.success() {
        bail!("{program} failed ({status})");
    }
    Ok(())
}

/// Log the child's stdout at INFO and its stderr at ERROR. While the session
/// runs both end up as headers above the ticker.
async fn stream_child(
    logger: &Arc<Logger>,
    segment: &Segment,
    program: &str,
    args: &[String],
) -> Result<ExitStatus> {
    let mut child = Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to start {program}"))?;
    let stdout = child.stdout.take().context("child stdout not captured")?;
    let stderr = child.stderr.take().context("child stderr not captured")?;
    tracing::debug!(program, pid = ?child.id(), "child started");

    let (out, err) = tokio::join!(
        pump_lines(stdout, LogWriter::new(Arc::clone(logger), Level::INFO), segment),
        pump_lines(stderr, LogWriter::new(Arc::clone(logger), Level::ERROR), segment),
    );
    out?;
    err?;

    Ok(child.wait().await?)
}

async fn pump_lines<R>(reader: R, mut writer: LogWriter, segment: &Segment) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Some(line) = lines.next_line().await? {
        writer.write_all(format!("{line}\n").as_bytes())?;
        let len = line.len() as u64 + 1;
        segment
            .file()
            .update(|p| p.total_bytes = Some(p.total_bytes.unwrap_or(0) + len));
    }
    writer.flush()?;
    Ok(())
}
