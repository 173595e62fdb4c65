use anyhow::Result;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::models::{ProjectMetadata, ScanEvent, ScanSummary};
use crate::scanner::classifier::{Classifier, DirectoryClassification};
use crate::scanner::events::{ScanEventSink, ScanReporter};
use crate::scanner::walker::DirectoryWalker;
use crate::utils::path::normalize_root;

/// 项目扫描器 - 宿主程序使用的入口
///
/// 每次扫描都使用独立的取消令牌，扫描器本身不在多次扫描之间保存状态。
#[derive(Debug, Clone)]
pub struct ProjectScanner {
    walker: Arc<DirectoryWalker>,
}

/// 正在后台运行的一次扫描
pub struct ScanHandle {
    events: Option<UnboundedReceiverStream<ScanEvent>>,
    cancel: CancellationToken,
    task: JoinHandle<ScanSummary>,
}

impl ProjectScanner {
    pub fn new(config: &Config) -> Self {
        Self {
            walker: Arc::new(DirectoryWalker::new(config)),
        }
    }

    /// 扫描给定根目录，事件推送到 `sink`
    pub async fn scan(
        &self,
        roots: &[String],
        sink: &dyn ScanEventSink,
        cancel: &CancellationToken,
    ) -> ScanSummary {
        let started_at = Utc::now();
        let requested: Vec<PathBuf> = roots.iter().map(|root| normalize_root(root)).collect();
        let roots = DirectoryWalker::validate_roots(&requested).await;
        tracing::info!(
            "开始扫描 Expo 项目，{} 个根目录中 {} 个有效",
            requested.len(),
            roots.len()
        );

        let reporter = ScanReporter::new(sink);
        let outcome = self.walker.walk(&roots, &reporter, cancel).await;
        let counts = reporter.counts();

        tracing::info!(
            "扫描结束 ({:?})：发现 {} 个项目，检查了 {} 个目录",
            outcome,
            counts.found,
            counts.scanned
        );

        ScanSummary {
            outcome,
            roots,
            scanned_dirs: counts.scanned,
            found_projects: counts.found,
            skipped_dirs: counts.skipped,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// 在后台启动一次扫描
    pub fn start(&self, roots: Vec<String>) -> ScanHandle {
        let (tx, rx) = mpsc::unbounded_channel::<ScanEvent>();
        let cancel = CancellationToken::new();

        let task = {
            let scanner = self.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { scanner.scan(&roots, &tx, &cancel).await })
        };

        ScanHandle {
            events: Some(UnboundedReceiverStream::new(rx)),
            cancel,
            task,
        }
    }

    /// 重新扫描单个项目目录，不是 Expo 项目时返回 `None`
    pub async fn inspect_project(&self, path: &str) -> Option<ProjectMetadata> {
        let dir = normalize_root(path);
        if !tokio::fs::metadata(&dir).await.ok()?.is_dir() {
            return None;
        }

        match Classifier::new().classify(&dir).await {
            DirectoryClassification::ExpoProject => {
                Some(self.walker.describe(&dir, &CancellationToken::new()).await)
            }
            other => {
                tracing::debug!("{} 不是 Expo 项目: {:?}", dir.display(), other);
                None
            }
        }
    }
}

impl ScanHandle {
    /// 取出事件流，只能取一次
    pub fn events(&mut self) -> Option<UnboundedReceiverStream<ScanEvent>> {
        self.events.take()
    }

    /// 请求取消，重复调用无副作用
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// 等待扫描结束
    pub async fn finish(self) -> Result<ScanSummary> {
        drop(self.events);
        Ok(self.task.await?)
    }
}
