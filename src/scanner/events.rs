use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;

use crate::models::{ProjectMetadata, ScanEvent, SkipReason};

/// 扫描事件的接收方
///
/// 同一层的多个目录检查会并发地推送事件，实现方需要能够容忍并发调用。
pub trait ScanEventSink: Send + Sync {
    fn emit(&self, event: ScanEvent);
}

impl ScanEventSink for mpsc::UnboundedSender<ScanEvent> {
    fn emit(&self, event: ScanEvent) {
        // 接收端已关闭说明没有人在监听，直接丢弃
        let _ = self.send(event);
    }
}

/// 包装事件接收方并统计各类事件数量
pub struct ScanReporter<'a> {
    sink: &'a dyn ScanEventSink,
    scanned: AtomicUsize,
    found: AtomicUsize,
    skipped: AtomicUsize,
}

/// 事件计数快照
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCounts {
    pub scanned: usize,
    pub found: usize,
    pub skipped: usize,
}

impl<'a> ScanReporter<'a> {
    pub fn new(sink: &'a dyn ScanEventSink) -> Self {
        Self {
            sink,
            scanned: AtomicUsize::new(0),
            found: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
        }
    }

    pub fn scanning(&self, path: &Path) {
        self.scanned.fetch_add(1, Ordering::Relaxed);
        self.sink.emit(ScanEvent::Scanning {
            path: path.to_path_buf(),
        });
    }

    pub fn found(&self, metadata: ProjectMetadata) {
        self.found.fetch_add(1, Ordering::Relaxed);
        tracing::info!("发现 Expo 项目: {}", metadata.path.display());
        self.sink.emit(ScanEvent::Found {
            metadata: Box::new(metadata),
        });
    }

    pub fn skipped(&self, path: &Path, reason: SkipReason) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("跳过 {}: {}", path.display(), reason);
        self.sink.emit(ScanEvent::Skipped {
            path: path.to_path_buf(),
            reason,
        });
    }

    pub fn counts(&self) -> EventCounts {
        EventCounts {
            scanned: self.scanned.load(Ordering::Relaxed),
            found: self.found.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }
}
