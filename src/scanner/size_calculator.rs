use std::path::Path;
use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;

use crate::utils::path::has_segment;
use crate::utils::size_format::format_size;

/// 每遍历多少个条目检查一次取消标志
pub const CANCEL_CHECK_INTERVAL: usize = 100;

/// 大小计算器 - 统计项目目录的总大小和去掉依赖后的大小
#[derive(Debug, Clone)]
pub struct SizeCalculator {
    /// 不计入项目大小的路径段
    excluded_segments: Vec<String>,
}

/// 项目大小统计结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSizes {
    /// 所有文件的总大小
    pub total: u64,

    /// 不含 node_modules 和 .git 的大小
    pub project_only: u64,
}

impl FolderSizes {
    pub fn total_display(&self) -> String {
        format_size(self.total)
    }

    pub fn project_display(&self) -> String {
        format_size(self.project_only)
    }
}

impl Default for SizeCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl SizeCalculator {
    /// 创建新的大小计算器
    pub fn new() -> Self {
        Self::with_excluded_segments(vec!["node_modules".to_string(), ".git".to_string()])
    }

    /// 使用自定义的排除目录创建计算器
    pub fn with_excluded_segments(excluded_segments: Vec<String>) -> Self {
        Self { excluded_segments }
    }

    /// 同步遍历整个目录树并累加文件大小
    ///
    /// 被取消时返回已经累加的部分结果。
    pub fn calculate(&self, root: &Path, cancel: &CancellationToken) -> FolderSizes {
        let mut sizes = FolderSizes::default();

        let entries = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| entry.ok());

        for (visited, entry) in entries.enumerate() {
            if (visited + 1) % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
                tracing::debug!("大小计算被取消: {}", root.display());
                return sizes;
            }

            if !entry.file_type().is_file() {
                continue;
            }

            let file_size = match entry.metadata() {
                Ok(metadata) => metadata.len(),
                Err(_) => continue, // 文件在遍历过程中消失
            };

            sizes.total += file_size;

            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            if !has_segment(relative, &self.excluded_segments) {
                sizes.project_only += file_size;
            }
        }

        sizes
    }

    /// 在阻塞线程池中计算大小
    pub async fn calculate_async(&self, root: &Path, cancel: &CancellationToken) -> FolderSizes {
        let calculator = self.clone();
        let root = root.to_path_buf();
        let cancel = cancel.clone();

        tokio::task::spawn_blocking(move || calculator.calculate(&root, &cancel))
            .await
            .unwrap_or_default()
    }
}
