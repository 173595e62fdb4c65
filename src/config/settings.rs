use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

use crate::config::defaults::DefaultConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 扫描的根目录列表
    pub scan_paths: Vec<String>,

    /// 扫描配置
    pub scan: ScanConfig,

    /// 忽略配置
    pub ignore: IgnoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// 最大扫描深度，处于该深度的目录仍会被识别，但不再展开子目录
    pub max_depth: usize,

    /// 每一层同时检查的目录数上限
    pub max_concurrency: usize,

    /// 是否跟随符号链接（不做环检测）
    pub follow_symlinks: bool,

    /// 发现项目时是否计算目录大小
    pub calculate_sizes: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    /// 精确匹配的目录名
    pub names: BTreeSet<String>,

    /// 小写目录名中包含即忽略的片段
    pub substrings: BTreeSet<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan_paths: DefaultConfig::default_scan_paths(),
            scan: ScanConfig::default(),
            ignore: IgnoreConfig::default(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: DefaultConfig::MAX_DEPTH,
            max_concurrency: DefaultConfig::MAX_CONCURRENCY,
            follow_symlinks: false,
            calculate_sizes: true,
        }
    }
}

impl Default for IgnoreConfig {
    fn default() -> Self {
        Self {
            names: DefaultConfig::default_ignore_names(),
            substrings: DefaultConfig::default_ignore_substrings(),
        }
    }
}

impl IgnoreConfig {
    /// 子目录是否落在黑名单中（隐藏目录一律忽略）
    pub fn is_denied(&self, dir_name: &str) -> bool {
        if dir_name.starts_with('.') || self.names.contains(dir_name) {
            return true;
        }

        let lower = dir_name.to_lowercase();
        self.substrings.iter().any(|s| lower.contains(s.as_str()))
    }
}

impl Config {
    /// 从文件加载配置
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("解析配置文件失败: {}", path.display()))?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        // 确保目录存在
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("写入配置文件失败: {}", path.display()))?;
        Ok(())
    }

    /// 用默认配置覆盖文件，不读取原有内容
    pub fn reset_file(path: &Path) -> Result<Self> {
        let config = Self::default();
        config.save_to_file(path)?;
        Ok(config)
    }

    /// 获取默认配置文件路径
    pub fn default_config_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("无法找到配置目录"))?;
        path.push("expo-project-scanner");
        path.push("config.toml");
        Ok(path)
    }

    /// 加载配置，如果文件不存在则创建默认配置
    pub fn load_or_create_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            let config = Self::default();
            config.save_to_file(&config_path)?;
            Ok(config)
        }
    }
}
