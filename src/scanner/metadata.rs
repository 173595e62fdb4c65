use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::models::manifest::EXPO_PACKAGE;
use crate::models::{ExpoConfig, PackageManifest, ProjectMetadata};

/// 元数据提取器 - 从 app.json 和 package.json 中读取项目信息
///
/// 两个文件都允许缺失或损坏，缺失的字段直接留空。
#[derive(Debug, Clone, Default)]
pub struct MetadataExtractor;

impl MetadataExtractor {
    pub fn new() -> Self {
        Self
    }

    /// 提取项目元数据（不含大小信息）
    pub async fn extract(&self, dir: &Path) -> ProjectMetadata {
        let package = PackageManifest::read(dir).await.unwrap_or_default();
        let config = match ExpoConfig::read(dir).await {
            Some(config) => config,
            None => {
                tracing::debug!("app.json 缺失或无法解析，仅使用 package.json: {}", dir.display());
                ExpoConfig::default()
            }
        };

        let mut metadata = Self::build(dir, &package, &config);
        if let Some(icon) = &config.icon {
            metadata.icon_path = resolve_icon(dir, icon).await;
        }
        metadata
    }

    /// 按“配置优先、package.json 兜底”的规则合并两个清单
    fn build(dir: &Path, package: &PackageManifest, config: &ExpoConfig) -> ProjectMetadata {
        let mut metadata = ProjectMetadata::new(dir.to_path_buf());

        metadata.name = config.name.clone();
        metadata.slug = config.slug.clone();
        metadata.scheme = config.scheme.clone();
        metadata.version = config.version.clone().or_else(|| package.version.clone());
        metadata.sdk_version = config.sdk_version.clone().or_else(|| {
            package
                .dependency_version(EXPO_PACKAGE)
                .map(strip_range_prefix)
        });
        metadata.uses_new_arch = config.new_arch_enabled;
        metadata.orientation = config.orientation.clone();
        metadata.background_color = config.background_color.clone();
        metadata.primary_color = config.primary_color.clone();
        metadata.bundle_identifier = config.bundle_identifier().map(str::to_string);
        metadata.android_package = config.android_package().map(str::to_string);

        metadata.platforms = to_json_text(&config.platforms);
        metadata.permissions = to_json_text(&config.permissions);
        metadata.splash = to_json_text(&config.splash);
        metadata.updates = to_json_text(&config.updates);
        metadata.plugins = to_json_text(&config.plugins);
        metadata.extra = to_json_text(&config.extra);

        metadata.dependencies = to_json_text(&package.dependencies);
        metadata.dev_dependencies = to_json_text(&package.dev_dependencies);

        metadata
    }
}

/// 去掉版本号开头的一个 `^` 或 `~`
fn strip_range_prefix(version: &str) -> String {
    version
        .strip_prefix(|c: char| c == '^' || c == '~')
        .unwrap_or(version)
        .to_string()
}

fn to_json_text<T: Serialize>(value: &Option<T>) -> Option<String> {
    value.as_ref().and_then(|v| serde_json::to_string(v).ok())
}

/// 图标文件存在时才返回其绝对路径
///
/// 图标字段总是相对项目目录解析，以 `/` 开头的值也不会指向项目之外。
async fn resolve_icon(dir: &Path, icon: &str) -> Option<PathBuf> {
    let relative = icon.strip_prefix("./").unwrap_or(icon).trim_start_matches('/');
    if relative.is_empty() {
        return None;
    }
    let icon_path = dir.join(relative);

    match tokio::fs::metadata(&icon_path).await {
        Ok(_) => Some(icon_path),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[tokio::test]
    async fn test_extract_nested_config() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path();
        write(dir, "package.json", r#"{"version":"0.9.0","dependencies":{"expo":"~50.0.0"}}"#);
        write(
            dir,
            "app.json",
            r#"{"expo":{
                "name":"MyApp","slug":"myapp","sdkVersion":"50.0.0","version":"1.0.0",
                "newArchEnabled":true,"scheme":"myapp","orientation":"portrait",
                "platforms":["ios","android"],
                "ios":{"bundleIdentifier":"com.example.myapp"},
                "android":{"package":"com.example.myapp"},
                "splash":{"image":"./assets/splash.png"},
                "plugins":["expo-router",["expo-camera",{"permission":"x"}]],
                "extra":{"eas":{"projectId":"abc"}}
            }}"#,
        );

        let metadata = MetadataExtractor::new().extract(dir).await;

        assert_eq!(metadata.name.as_deref(), Some("MyApp"));
        assert_eq!(metadata.slug.as_deref(), Some("myapp"));
        assert_eq!(metadata.sdk_version.as_deref(), Some("50.0.0"));
        assert_eq!(metadata.version.as_deref(), Some("1.0.0"));
        assert_eq!(metadata.uses_new_arch, Some(true));
        assert_eq!(metadata.bundle_identifier.as_deref(), Some("com.example.myapp"));
        assert_eq!(metadata.android_package.as_deref(), Some("com.example.myapp"));
        assert_eq!(metadata.platforms.as_deref(), Some(r#"["ios","android"]"#));

        let plugins: serde_json::Value =
            serde_json::from_str(metadata.plugins.as_deref().unwrap()).unwrap();
        assert_eq!(plugins[0], "expo-router");

        let dependencies: serde_json::Value =
            serde_json::from_str(metadata.dependencies.as_deref().unwrap()).unwrap();
        assert_eq!(dependencies["expo"], "~50.0.0");
        assert_eq!(metadata.dev_dependencies, None);
    }

    #[tokio::test]
    async fn test_fallbacks_from_package_json() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path();
        write(dir, "package.json", r#"{"version":"2.3.4","dependencies":{"expo":"^51.0.8"}}"#);
        write(dir, "app.json", r#"{"expo":{"name":"NoVersion"}}"#);

        let metadata = MetadataExtractor::new().extract(dir).await;

        assert_eq!(metadata.name.as_deref(), Some("NoVersion"));
        assert_eq!(metadata.version.as_deref(), Some("2.3.4"));
        assert_eq!(metadata.sdk_version.as_deref(), Some("51.0.8"));
    }

    #[tokio::test]
    async fn test_invalid_app_json_degrades_to_package_json() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path();
        write(dir, "package.json", r#"{"dependencies":{"expo":"~49.0.1"},"devDependencies":{"typescript":"5.0.0"}}"#);
        write(dir, "app.json", "{ this is not json");

        let metadata = MetadataExtractor::new().extract(dir).await;

        assert_eq!(metadata.name, None);
        assert_eq!(metadata.version, None);
        assert_eq!(metadata.sdk_version.as_deref(), Some("49.0.1"));
        assert!(metadata.dev_dependencies.is_some());
        assert_eq!(metadata.folder_name, dir.file_name().unwrap().to_string_lossy());
    }

    #[tokio::test]
    async fn test_icon_only_when_file_exists() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path();
        write(dir, "package.json", r#"{"dependencies":{"expo":"50.0.0"}}"#);
        write(dir, "app.json", r#"{"expo":{"icon":"./assets/icon.png"}}"#);

        let metadata = MetadataExtractor::new().extract(dir).await;
        assert_eq!(metadata.icon_path, None);

        fs::create_dir(dir.join("assets")).unwrap();
        write(dir, "assets/icon.png", "png");

        let metadata = MetadataExtractor::new().extract(dir).await;
        assert_eq!(metadata.icon_path, Some(dir.join("assets/icon.png")));
    }

    #[tokio::test]
    async fn test_absolute_icon_stays_inside_project() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path();
        write(dir, "package.json", r#"{"dependencies":{"expo":"50.0.0"}}"#);
        write(dir, "app.json", r#"{"expo":{"icon":"/etc/hostname"}}"#);

        let metadata = MetadataExtractor::new().extract(dir).await;
        assert_eq!(metadata.icon_path, None);

        fs::create_dir(dir.join("etc")).unwrap();
        write(dir, "etc/hostname", "icon");

        let metadata = MetadataExtractor::new().extract(dir).await;
        assert_eq!(metadata.icon_path, Some(dir.join("etc/hostname")));
    }

    #[test]
    fn test_strip_range_prefix() {
        assert_eq!(strip_range_prefix("^50.0.0"), "50.0.0");
        assert_eq!(strip_range_prefix("~50.0.0"), "50.0.0");
        assert_eq!(strip_range_prefix("50.0.0"), "50.0.0");
        assert_eq!(strip_range_prefix(">=50.0.0"), ">=50.0.0");
    }
}
