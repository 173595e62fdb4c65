use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// 一次扫描的最终状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanOutcome {
    /// 遍历自然结束
    Completed,

    /// 被取消，已上报的项目仍然有效
    Cancelled,

    /// 所有根目录都不存在或不是目录
    NothingToScan,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary {
    pub outcome: ScanOutcome,

    /// 通过校验的根目录
    pub roots: Vec<PathBuf>,

    /// 检查过的目录数量
    pub scanned_dirs: usize,

    /// 发现的项目数量
    pub found_projects: usize,

    /// 跳过的项目目录数量
    pub skipped_dirs: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ScanOutcome {
    pub fn is_cancelled(&self) -> bool {
        *self == ScanOutcome::Cancelled
    }
}

impl ScanSummary {
    /// 获取扫描耗时的友好显示
    pub fn duration_display(&self) -> String {
        let duration = self
            .finished_at
            .signed_duration_since(self.started_at)
            .to_std()
            .unwrap_or_default();

        let seconds = duration.as_secs();
        if seconds == 0 {
            format!("{}ms", duration.as_millis())
        } else if seconds < 60 {
            format!("{}s", seconds)
        } else {
            format!("{}m {}s", seconds / 60, seconds % 60)
        }
    }
}
