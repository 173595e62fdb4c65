use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::models::ProjectMetadata;

/// 扫描过程中推送给宿主的事件
///
/// 同一目录的 `Scanning` 一定先于它的 `Found`/`Skipped`；
/// 并发处理的兄弟目录之间没有顺序保证。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScanEvent {
    /// 开始检查某个目录
    Scanning { path: PathBuf },

    /// 发现 Expo 项目
    Found { metadata: Box<ProjectMetadata> },

    /// 目录是其他类型的项目，不再深入
    Skipped { path: PathBuf, reason: SkipReason },
}

/// 跳过目录的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// 有 package.json 但没有依赖 expo
    NotExpo,

    /// 依赖了 expo 但没有 app.json / app.config.*（通常是库）
    MissingAppConfig,
}

impl ScanEvent {
    pub fn path(&self) -> &Path {
        match self {
            ScanEvent::Scanning { path } | ScanEvent::Skipped { path, .. } => path,
            ScanEvent::Found { metadata } => &metadata.path,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ScanEvent::Found { .. })
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotExpo => write!(f, "非 Expo 项目"),
            SkipReason::MissingAppConfig => write!(f, "缺少 app.json"),
        }
    }
}
