//! Frame renderer tests (driven directly, no render thread).

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use super::*;
use crate::render::status::SharedQueueStatus;
use crate::ticker::{DownloadFile, FileProgress};

#[derive(Default)]
struct Capture(Mutex<Vec<String>>);

impl Capture {
    fn writes(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    fn last(&self) -> String {
        self.writes().last().cloned().unwrap_or_default()
    }
}

impl FrameOutput for Capture {
    fn emit_scroll(&self, text: &str) {
        self.0.lock().unwrap().push(text.to_string());
    }
}

struct Fixture {
    registry: Arc<TickerRegistry>,
    status: Arc<SharedQueueStatus>,
    out: Arc<Capture>,
    shutting_down: Arc<AtomicBool>,
    renderer: FrameRenderer,
}

fn fixture(delay: u32) -> Fixture {
    let registry = Arc::new(TickerRegistry::new());
    let status = Arc::new(SharedQueueStatus::default());
    let out = Arc::new(Capture::default());
    let shutting_down = Arc::new(AtomicBool::new(false));
    let renderer = FrameRenderer::new(
        Arc::clone(&registry),
        Arc::clone(&status) as Arc<dyn QueueStatus>,
        Arc::clone(&out) as Arc<dyn FrameOutput>,
        Arc::clone(&shutting_down),
        delay,
        false,
    );
    Fixture {
        registry,
        status,
        out,
        shutting_down,
        renderer,
    }
}

fn file(name: &str, pct: u32, speed: f64) -> Arc<DownloadFile> {
    DownloadFile::new(FileProgress {
        show_filename: Some(name.to_string()),
        download_percentage: Some(pct),
        speed_kbps: Some(speed),
        ..FileProgress::default()
    })
}

#[test]
fn items_render_in_priority_order_with_total_and_eta() {
    let mut fx = fixture(3);
    fx.status.set_queued_bytes(420 * 1024);
    fx.renderer.begin();
    fx.registry.add(Segment::new(2, 1, file("B.rar", 50, 2.0)));
    fx.registry.add(Segment::new(1, 1, file("A.rar", 10, 5.0)));
    fx.renderer.request_redraw(true);

    let frame = fx.out.last();
    let a = frame.find("A.rar").expect("A rendered");
    let b = frame.find("B.rar").expect("B rendered");
    let total = frame.find("Total").expect("total rendered");
    assert!(a < b && b < total);
    assert!(frame.contains(" 7.0KB/s"), "{frame:?}");
    assert!(frame.contains("ETA: \x1b[33;1m00:01:00"), "{frame:?}");
    assert!(frame.contains("10%") && frame.contains("50%"));
}

#[test]
fn full_line_is_byte_exact() {
    let mut fx = fixture(1);
    fx.renderer.begin();
    fx.registry.add(Segment::new(1, 1, file("A.rar", 10, 5.0)));
    fx.renderer.request_redraw(true);
    let expected = concat!(
        "\x1b[34m[\x1b[0m1\x1b[34m]\x1b[0m A.rar - \x1b[32m10%\x1b[0m\x1b[34m @ \x1b[0m\x1b[31m5.0KB/s\x1b[K\n\r",
        "\x1b[34m[\x1b[0mTotal\x1b[34m]\x1b[0m\x1b[31m 5.0KB/s\x1b[0m, \x1b[32m0 MB\x1b[0m queued, ETA: \x1b[33;1m00:00:00\x1b[0m\x1b[K",
    );
    assert_eq!(fx.out.last(), expected);
}

#[test]
fn first_frame_skips_erase_and_later_frames_move_up_over_slots() {
    let mut fx = fixture(1);
    fx.renderer.begin();
    fx.registry.add(Segment::new(1, 1, file("a", 1, 1.0)));
    fx.registry.add(Segment::new(2, 1, file("b", 1, 1.0)));
    fx.renderer.request_redraw(false);
    assert!(fx.out.last().starts_with("\x1b[34m["));

    fx.registry.add(Segment::new(3, 1, file("c", 1, 1.0)));
    fx.renderer.request_redraw(false);
    assert!(fx.out.last().starts_with("\r\x1b[2A"), "{:?}", fx.out.last());

    fx.renderer.request_redraw(true);
    assert!(fx.out.last().starts_with("\r\x1b[3A"));
}

#[test]
fn identical_frames_are_written_once() {
    let mut fx = fixture(1);
    fx.renderer.begin();
    fx.registry.add(Segment::new(1, 1, file("a", 1, 1.0)));
    fx.renderer.request_redraw(false);
    fx.renderer.request_redraw(false);
    assert_eq!(fx.out.writes().len(), 2);

    fx.renderer.request_redraw(false);
    fx.renderer.request_redraw(false);
    assert_eq!(fx.out.writes().len(), 2);

    fx.renderer.request_redraw(true);
    assert_eq!(fx.out.writes().len(), 3);
}

#[test]
fn unforced_requests_are_throttled() {
    let mut fx = fixture(3);
    fx.renderer.begin();
    fx.renderer.request_redraw(false);
    fx.renderer.request_redraw(false);
    assert!(fx.out.writes().is_empty());
    fx.renderer.request_redraw(false);
    assert_eq!(fx.out.writes().len(), 1);
}

#[test]
fn headers_are_drained_exactly_once() {
    let mut fx = fixture(3);
    fx.renderer.begin();
    fx.renderer.scroll_header("disk full");
    let frame = fx.out.last();
    assert!(frame.starts_with("disk full\x1b[K\n"), "{frame:?}");
    assert!(fx.renderer.pending_headers().is_empty());

    fx.renderer.request_redraw(true);
    assert!(!fx.out.last().contains("disk full"));
}

#[test]
fn long_header_wraps_to_eighty_columns() {
    let mut fx = fixture(3);
    fx.renderer.begin();
    let message = "y".repeat(200);
    fx.renderer.scroll_header(&message);
    let frame = fx.out.last();
    let header_part = &frame[..frame.find("\x1b[34m[").unwrap()];
    let lines: Vec<&str> = header_part
        .split('\n')
        .filter(|l| !l.is_empty())
        .map(|l| l.trim_end_matches("\x1b[K"))
        .collect();
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|l| l.len() <= HEADER_WIDTH));
    assert_eq!(lines.concat(), message);
}

#[test]
fn multi_line_header_wraps_each_line() {
    let mut fx = fixture(3);
    fx.shutting_down.store(true, Ordering::Relaxed);
    fx.renderer.begin();
    fx.renderer.scroll_header(&format!("short\n{}", "z".repeat(90)));
    let headers = fx.renderer.pending_headers().to_vec();
    assert_eq!(headers.len(), 2);
    assert_eq!(headers[0], "short");
    assert_eq!(headers[1], format!("{}\n{}", "z".repeat(80), "z".repeat(10)));
    assert!(fx.out.writes().is_empty(), "no redraw while shutting down");
}

#[test]
fn idle_slots_are_padded_to_high_water_mark() {
    let mut fx = fixture(1);
    fx.renderer.begin();
    let segs: Vec<_> = (0..3)
        .map(|i| Segment::new(i, 1, file(&format!("f{i}"), 5, 1.0)))
        .collect();
    for s in &segs {
        fx.registry.add(Arc::clone(s));
    }
    fx.registry.remove(&segs[1]);
    fx.registry.remove(&segs[2]);
    fx.renderer.request_redraw(true);
    let frame = fx.out.last();
    assert_eq!(frame.matches("\n\r").count(), 3);
    assert!(frame.contains("\x1b[34m[\x1b[0m3\x1b[34m]\x1b[0m\x1b[K\n\r"));
}

#[test]
fn segments_of_the_same_file_use_continuation_lines() {
    let mut fx = fixture(1);
    fx.renderer.begin();
    let shared = file("movie.mkv", 30, 12.0);
    fx.registry.add(Segment::new(1, 1, Arc::clone(&shared)));
    fx.registry.add(Segment::new(1, 2, Arc::clone(&shared)));
    fx.renderer.request_redraw(true);
    let frame = fx.out.last();
    assert_eq!(frame.matches("30%").count(), 1);
    assert!(frame.contains("\x1b[34m[\x1b[0m2\x1b[34m]\x1b[0m movie.mkv\x1b[K\n\r"));
    assert!(frame.contains(" 12.0KB/s"), "file speed counted once: {frame:?}");
}

#[test]
fn total_speed_counts_distinct_files_with_equal_names_separately() {
    let mut fx = fixture(1);
    fx.renderer.begin();
    let first = file("disc.iso", 10, 4.0);
    let second = file("disc.iso", 20, 6.0);
    fx.registry.add(Segment::new(1, 1, Arc::clone(&first)));
    fx.registry.add(Segment::new(1, 2, Arc::clone(&first)));
    fx.registry.add(Segment::new(2, 1, second));
    fx.renderer.request_redraw(true);
    let frame = fx.out.last();
    assert!(frame.contains(" 10.0KB/s"), "{frame:?}");
}

#[test]
fn labels_are_zero_padded_past_nine_slots() {
    let mut fx = fixture(1);
    fx.renderer.begin();
    for i in 0..10 {
        fx.registry.add(Segment::new(i, 1, file(&format!("f{i}"), 1, 1.0)));
    }
    fx.renderer.request_redraw(true);
    let frame = fx.out.last();
    assert!(frame.contains("\x1b[0m01\x1b[34m]"));
    assert!(frame.contains("\x1b[0m10\x1b[34m]"));
}

#[test]
fn long_names_are_truncated() {
    let mut fx = fixture(1);
    fx.renderer.begin();
    let long = "n".repeat(100);
    fx.registry.add(Segment::new(1, 1, file(&long, 1, 1.0)));
    fx.renderer.request_redraw(true);
    let frame = fx.out.last();
    assert!(frame.contains(&format!(" {}... - ", "n".repeat(NAME_WIDTH - 3))));
}

#[test]
fn missing_fields_degrade_single_lines() {
    let mut fx = fixture(1);
    fx.renderer.begin();
    fx.registry.add(Segment::new(1, 1, DownloadFile::with_temp_name("pending")));
    fx.registry.add(Segment::new(2, 1, DownloadFile::new(FileProgress::default())));
    fx.registry.add(Segment::new(3, 1, file("ok.bin", 99, 3.5)));
    fx.renderer.request_redraw(true);
    let frame = fx.out.last();
    assert!(frame.contains("]\x1b[0m pending\x1b[K\n\r"));
    assert!(frame.contains("\x1b[34m[\x1b[0m2\x1b[34m]\x1b[0m\x1b[K\n\r"));
    assert!(frame.contains("ok.bin - "));
    assert!(frame.contains(" 3.5KB/s\x1b[0m"));
}

#[test]
fn paused_indicator_on_total_line() {
    let mut fx = fixture(1);
    fx.status.set_paused(true);
    fx.status.set_queued_bytes(5 * 1024 * 1024);
    fx.renderer.begin();
    fx.renderer.request_redraw(true);
    let frame = fx.out.last();
    assert!(frame.contains("5 MB"));
    assert!(frame.ends_with("\x1b[36m [Paused]\x1b[0m\x1b[K"));
    assert!(frame.contains("ETA: \x1b[33;1m00:00:00"));
}

#[test]
fn kill_history_erases_high_water_mark_plus_one() {
    let mut fx = fixture(3);
    fx.renderer.begin();
    for i in 0..3 {
        fx.registry.add(Segment::new(i, 1, file("f", 1, 1.0)));
    }
    fx.renderer.kill_history();

    let mut expected = String::from("\r\x1b[4A");
    for _ in 0..4 {
        expected.push_str("\n\r\x1b[K");
    }
    expected.push_str("\r\x1b[4A");
    assert_eq!(fx.out.writes(), vec![expected]);
    assert!(fx.registry.is_empty());
    assert_eq!(fx.registry.high_water_mark(), 0);
    assert!(!fx.renderer.is_started());

    fx.renderer.kill_history();
    assert_eq!(fx.out.writes().len(), 1);
}

#[test]
fn no_frames_after_kill_history() {
    let mut fx = fixture(1);
    fx.renderer.begin();
    fx.renderer.request_redraw(true);
    fx.renderer.kill_history();
    let writes = fx.out.writes().len();
    fx.renderer.request_redraw(true);
    fx.renderer.request_redraw(false);
    assert_eq!(fx.out.writes().len(), writes);

    fx.renderer.begin();
    fx.renderer.request_redraw(false);
    let frame = fx.out.last();
    assert!(frame.starts_with("\x1b[34m[\x1b[0mTotal"), "fresh frame: {frame:?}");
}

#[test]
fn headers_outside_a_session_are_printed_plainly() {
    let mut fx = fixture(3);
    fx.renderer.scroll_header("late message");
    assert_eq!(fx.out.writes(), vec!["late message\n".to_string()]);
}

#[test]
fn daemon_mode_renders_nothing() {
    let registry = Arc::new(TickerRegistry::new());
    let out = Arc::new(Capture::default());
    let mut renderer = FrameRenderer::new(
        Arc::clone(&registry),
        Arc::new(SharedQueueStatus::default()),
        Arc::clone(&out) as Arc<dyn FrameOutput>,
        Arc::new(AtomicBool::new(false)),
        1,
        true,
    );
    renderer.begin();
    registry.add(Segment::new(1, 1, file("a", 1, 1.0)));
    renderer.request_redraw(true);
    renderer.scroll_header("hidden");
    renderer.kill_history();
    assert!(out.writes().is_empty());
    assert!(registry.is_empty());
}
