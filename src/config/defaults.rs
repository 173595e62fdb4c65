use std::collections::BTreeSet;

pub struct DefaultConfig;

impl DefaultConfig {
    /// 默认最大扫描深度（根目录为第 0 层）
    pub const MAX_DEPTH: usize = 4;

    /// 每一层同时检查的目录数上限
    pub const MAX_CONCURRENCY: usize = 10;

    /// 遍历时永远不进入的目录名（精确匹配）
    pub fn default_ignore_names() -> BTreeSet<String> {
        [
            // 依赖与构建产物
            "node_modules",
            "build",
            "dist",
            "target",
            "coverage",
            "vendor",
            "__pycache__",
            "venv",
            // 原生平台目录，Expo 项目本身不会嵌在这里
            "ios",
            "android",
            "macos",
            "Pods",
            "DerivedData",
            // 版本控制
            ".git",
            ".svn",
            ".hg",
            // 框架与工具缓存
            ".expo",
            ".next",
            ".cache",
            ".gradle",
            // IDE 目录
            ".idea",
            ".vscode",
            ".vs",
            // macOS 系统目录
            "Library",
            "Applications",
            "System",
            ".Trash",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    /// 目录名（转小写后）包含这些片段时不进入
    pub fn default_ignore_substrings() -> BTreeSet<String> {
        [
            // 模拟器与 Xcode 产物
            "simulator",
            ".app",
            ".xcodeproj",
            ".xcworkspace",
            // 常见的非源码用户目录
            "downloads",
            "pictures",
            "music",
            "movies",
            "backup",
            "archive",
            "cache",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    /// 默认扫描的根目录
    pub fn default_scan_paths() -> Vec<String> {
        ["Documents", "Desktop", "Developer", "Projects", "Code", "Development"]
            .iter()
            .map(|dir| {
                dirs::home_dir()
                    .map(|p| p.join(dir).to_string_lossy().to_string())
                    .unwrap_or_else(|| format!("~/{}", dir))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ignore_names_cover_dependency_dirs() {
        let names = DefaultConfig::default_ignore_names();

        for name in ["node_modules", "build", "dist", ".git", "ios", "android"] {
            assert!(names.contains(name), "缺少 {}", name);
        }
    }

    #[test]
    fn test_default_substrings_are_lowercase() {
        for substring in DefaultConfig::default_ignore_substrings() {
            assert_eq!(substring, substring.to_lowercase());
        }
    }

    #[test]
    fn test_default_scan_paths() {
        let paths = DefaultConfig::default_scan_paths();
        assert_eq!(paths.len(), 6);
        assert!(paths.iter().any(|p| p.ends_with("Developer")));
    }
}
