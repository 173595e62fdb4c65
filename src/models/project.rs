use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 一个被发现的 Expo 项目的元数据
///
/// 列表或对象类型的配置项（`platforms`、`splash` 等）以 JSON 文本形式保存，
/// 扫描器不关心它们的内部结构，只负责原样传递。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    /// 项目目录名
    pub folder_name: String,

    /// 项目绝对路径（宿主用它去重）
    pub path: PathBuf,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,

    /// 应用版本，app.json 优先，其次 package.json
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Expo SDK 版本，缺省时取 expo 依赖的版本号
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdk_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub uses_new_arch: Option<bool>,

    /// 图标的绝对路径，仅在文件确实存在时填写
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_path: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub platforms: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_identifier: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub android_package: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub splash: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updates: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_dependencies: Option<String>,

    /// 目录总大小
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_size: Option<String>,

    /// 不含 node_modules 和 .git 的大小
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_size: Option<String>,
}

impl ProjectMetadata {
    pub fn new(path: PathBuf) -> Self {
        let folder_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        Self {
            folder_name,
            path,
            ..Default::default()
        }
    }

    /// 显示用名称，没有配置名称时使用目录名
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.folder_name)
    }

    /// 获取 SDK 版本的显示文本
    pub fn sdk_display(&self) -> String {
        match &self.sdk_version {
            Some(version) => format!("SDK {}", version),
            None => "-".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_last_segment() {
        let metadata = ProjectMetadata::new(PathBuf::from("/home/me/code/my-app"));
        assert_eq!(metadata.folder_name, "my-app");
        assert_eq!(metadata.display_name(), "my-app");
        assert_eq!(metadata.sdk_display(), "-");
    }

    #[test]
    fn test_serializes_camel_case_and_skips_missing() {
        let mut metadata = ProjectMetadata::new(PathBuf::from("/tmp/app"));
        metadata.sdk_version = Some("50.0.0".to_string());

        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["folderName"], "app");
        assert_eq!(json["sdkVersion"], "50.0.0");
        assert!(json.get("iconPath").is_none());
    }
}
