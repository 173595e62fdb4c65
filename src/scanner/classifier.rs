use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::models::manifest::{APP_CONFIG_FILES, EXPO_PACKAGE, PACKAGE_JSON};
use crate::models::{PackageManifest, SkipReason};

/// 目录分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryClassification {
    /// 依赖 expo 且带有 app.json / app.config.*
    ExpoProject,

    /// 其他项目，不再深入
    OtherProject(SkipReason),

    /// 不是项目，可以继续向下扫描
    NotAProject,
}

/// 一次 `read_dir` 得到的目录内容（不递归）
#[derive(Debug, Default)]
pub struct DirectoryListing {
    /// 所有直接子项的名称
    names: HashSet<String>,

    /// 直接子目录
    pub subdirs: Vec<PathBuf>,
}

impl DirectoryListing {
    /// 读取目录，无法读取时返回 `None`
    pub async fn read(dir: &Path, follow_symlinks: bool) -> Option<Self> {
        let mut entries = tokio::fs::read_dir(dir).await.ok()?;
        let mut listing = Self::default();

        // 中途出错时保留已读到的部分
        while let Ok(Some(entry)) = entries.next_entry().await {
            let is_dir = match entry.file_type().await {
                Ok(ft) if ft.is_dir() => true,
                Ok(ft) if ft.is_symlink() && follow_symlinks => tokio::fs::metadata(entry.path())
                    .await
                    .map(|m| m.is_dir())
                    .unwrap_or(false),
                _ => false,
            };

            if is_dir {
                listing.subdirs.push(entry.path());
            }
            listing
                .names
                .insert(entry.file_name().to_string_lossy().into_owned());
        }

        Some(listing)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    fn has_app_config(&self) -> bool {
        APP_CONFIG_FILES.iter().any(|name| self.contains(name))
    }
}

/// 目录分类器 - 只看目录自身的直接子项和 package.json 内容
#[derive(Debug, Clone, Default)]
pub struct Classifier;

impl Classifier {
    pub fn new() -> Self {
        Self
    }

    /// 读取并分类指定目录，读取失败视为 `NotAProject`
    pub async fn classify(&self, dir: &Path) -> DirectoryClassification {
        match DirectoryListing::read(dir, false).await {
            Some(listing) => self.classify_listing(dir, &listing).await,
            None => DirectoryClassification::NotAProject,
        }
    }

    /// 基于已读取的目录内容分类
    pub async fn classify_listing(
        &self,
        dir: &Path,
        listing: &DirectoryListing,
    ) -> DirectoryClassification {
        if !listing.contains(PACKAGE_JSON) {
            return DirectoryClassification::NotAProject;
        }

        let Some(manifest) = PackageManifest::read(dir).await else {
            tracing::debug!("package.json 无法解析: {}", dir.display());
            return DirectoryClassification::NotAProject;
        };

        if !manifest.has_dependency(EXPO_PACKAGE) {
            return DirectoryClassification::OtherProject(SkipReason::NotExpo);
        }

        if listing.has_app_config() {
            DirectoryClassification::ExpoProject
        } else {
            DirectoryClassification::OtherProject(SkipReason::MissingAppConfig)
        }
    }
}
