//! Segments and the files they belong to.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

static NEXT_SEGMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a segment; two segments with equal priority still differ here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(u64);

/// Mutable progress of one file, updated by the download engine.
/// Fields the engine has not filled in yet are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileProgress {
    /// Name currently shown in the ticker.
    pub show_filename: Option<String>,
    /// `show_filename` is a placeholder until the real filename is known.
    pub show_filename_is_temp: bool,
    /// Real filename, once decoded.
    pub filename: Option<String>,
    pub download_percentage: Option<u32>,
    /// Transfer speed in KB/s.
    pub speed_kbps: Option<f64>,
    pub total_bytes: Option<u64>,
}

/// A file being downloaded, shared by all of its segments.
#[derive(Debug, Default)]
pub struct DownloadFile {
    progress: RwLock<FileProgress>,
}

impl DownloadFile {
    pub fn new(progress: FileProgress) -> Arc<Self> {
        Arc::new(Self {
            progress: RwLock::new(progress),
        })
    }

    /// File known only by a temporary display name.
    pub fn with_temp_name(name: impl Into<String>) -> Arc<Self> {
        Self::new(FileProgress {
            show_filename: Some(name.into()),
            show_filename_is_temp: true,
            ..FileProgress::default()
        })
    }

    pub fn update(&self, f: impl FnOnce(&mut FileProgress)) {
        let mut progress = self.progress.write().unwrap_or_else(|e| e.into_inner());
        f(&mut progress);
    }

    /// Current progress. A temporary display name is replaced by the real filename
    /// as soon as one is known.
    pub fn snapshot(&self) -> FileProgress {
        let mut progress = self.progress.write().unwrap_or_else(|e| e.into_inner());
        if progress.show_filename_is_temp {
            if let Some(real) = progress.filename.clone() {
                progress.show_filename = Some(real);
                progress.show_filename_is_temp = false;
            }
        }
        progress.clone()
    }
}

/// One in-flight transfer.
#[derive(Debug)]
pub struct Segment {
    id: SegmentId,
    priority: u32,
    number: u32,
    file: Arc<DownloadFile>,
}

impl Segment {
    /// Lower `priority` values sort first.
    pub fn new(priority: u32, number: u32, file: Arc<DownloadFile>) -> Arc<Self> {
        Arc::new(Self {
            id: SegmentId(NEXT_SEGMENT_ID.fetch_add(1, Ordering::Relaxed)),
            priority,
            number,
            file,
        })
    }

    pub fn id(&self) -> SegmentId {
        self.id
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Segment number within its file.
    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn file(&self) -> &Arc<DownloadFile> {
        &self.file
    }

    pub fn same_file(&self, other: &Segment) -> bool {
        Arc::ptr_eq(&self.file, &other.file)
    }
}
