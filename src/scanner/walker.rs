//! 按层推进、层内并发受限的目录遍历器。

use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

use crate::config::{Config, IgnoreConfig, ScanConfig};
use crate::models::{ProjectMetadata, ScanOutcome};
use crate::scanner::classifier::{Classifier, DirectoryClassification, DirectoryListing};
use crate::scanner::events::ScanReporter;
use crate::scanner::metadata::MetadataExtractor;
use crate::scanner::size_calculator::SizeCalculator;

/// 目录遍历器 - 逐层分类目录、上报项目并收集下一层要扫描的子目录
///
/// 每一层最多同时检查 `max_concurrency` 个目录，整层完成后才进入下一层。
#[derive(Debug, Clone)]
pub struct DirectoryWalker {
    scan: ScanConfig,
    ignore: IgnoreConfig,
    classifier: Classifier,
    extractor: MetadataExtractor,
    size_calculator: SizeCalculator,
}

impl DirectoryWalker {
    pub fn new(config: &Config) -> Self {
        Self {
            scan: config.scan.clone(),
            ignore: config.ignore.clone(),
            classifier: Classifier::new(),
            extractor: MetadataExtractor::new(),
            size_calculator: SizeCalculator::new(),
        }
    }

    /// 从给定根目录开始遍历
    pub async fn walk(
        &self,
        roots: &[PathBuf],
        reporter: &ScanReporter<'_>,
        cancel: &CancellationToken,
    ) -> ScanOutcome {
        let mut frontier = Self::validate_roots(roots).await;
        if frontier.is_empty() {
            tracing::info!("没有可扫描的目录");
            return ScanOutcome::NothingToScan;
        }

        let concurrency = self.scan.max_concurrency.max(1);
        let mut depth = 0;

        while !frontier.is_empty() {
            if cancel.is_cancelled() {
                return ScanOutcome::Cancelled;
            }

            // 到达最大深度的目录照常分类，但不再展开
            let expand = depth < self.scan.max_depth;
            tracing::debug!("扫描第 {} 层，共 {} 个目录", depth, frontier.len());

            frontier = stream::iter(frontier)
                .map(|dir| self.inspect(dir, expand, reporter, cancel))
                .buffer_unordered(concurrency)
                .concat()
                .await;
            depth += 1;
        }

        if cancel.is_cancelled() {
            ScanOutcome::Cancelled
        } else {
            ScanOutcome::Completed
        }
    }

    /// 保留存在且是目录的根路径，去掉重复项
    pub async fn validate_roots(roots: &[PathBuf]) -> Vec<PathBuf> {
        let mut seen = HashSet::new();
        let mut valid = Vec::new();

        for root in roots {
            let is_dir = tokio::fs::metadata(root)
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false);

            if !is_dir {
                tracing::debug!("忽略无效的扫描路径: {}", root.display());
                continue;
            }
            if seen.insert(root.clone()) {
                valid.push(root.clone());
            }
        }

        valid
    }

    /// 检查单个目录，返回下一层需要扫描的子目录
    async fn inspect(
        &self,
        dir: PathBuf,
        expand: bool,
        reporter: &ScanReporter<'_>,
        cancel: &CancellationToken,
    ) -> Vec<PathBuf> {
        if cancel.is_cancelled() {
            return Vec::new();
        }

        reporter.scanning(&dir);

        let Some(listing) = DirectoryListing::read(&dir, self.scan.follow_symlinks).await else {
            tracing::debug!("无法读取目录: {}", dir.display());
            return Vec::new();
        };

        match self.classifier.classify_listing(&dir, &listing).await {
            DirectoryClassification::ExpoProject => {
                // 提取元数据（尤其是计算大小）可能很慢
                if cancel.is_cancelled() {
                    return Vec::new();
                }
                let metadata = self.describe(&dir, cancel).await;
                reporter.found(metadata);
                Vec::new()
            }
            DirectoryClassification::OtherProject(reason) => {
                reporter.skipped(&dir, reason);
                Vec::new()
            }
            DirectoryClassification::NotAProject if expand => listing
                .subdirs
                .into_iter()
                .filter(|subdir| !self.is_denied(subdir))
                .collect(),
            DirectoryClassification::NotAProject => Vec::new(),
        }
    }

    /// 提取项目元数据，按配置附加大小信息
    pub async fn describe(&self, dir: &Path, cancel: &CancellationToken) -> ProjectMetadata {
        let mut metadata = self.extractor.extract(dir).await;

        if self.scan.calculate_sizes {
            let sizes = self.size_calculator.calculate_async(dir, cancel).await;
            metadata.folder_size = Some(sizes.total_display());
            metadata.project_size = Some(sizes.project_display());
        }

        metadata
    }

    fn is_denied(&self, dir: &Path) -> bool {
        match dir.file_name() {
            Some(name) => self.ignore.is_denied(&name.to_string_lossy()),
            None => true,
        }
    }
}
