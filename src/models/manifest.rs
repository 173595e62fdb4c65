//! `package.json` 与 `app.json` 的类型化模型。
//!
//! 所有字段都是宽松解析的：某个字段类型不对时只丢弃该字段，而不是让整个文件解析失败。

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

pub const PACKAGE_JSON: &str = "package.json";
pub const APP_JSON: &str = "app.json";

/// 任意一个存在即视为有 Expo 应用配置
pub const APP_CONFIG_FILES: [&str; 3] = [APP_JSON, "app.config.js", "app.config.ts"];

/// 识别 Expo 项目所依赖的包名
pub const EXPO_PACKAGE: &str = "expo";

/// `app.json` 中嵌套 Expo 配置的键名
const EXPO_CONFIG_KEY: &str = "expo";

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// `package.json` 中本工具关心的部分
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub version: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub dependencies: Option<Map<String, Value>>,

    #[serde(default, deserialize_with = "lenient")]
    pub dev_dependencies: Option<Map<String, Value>>,
}

impl PackageManifest {
    /// 解析文件内容，非法 JSON 或顶层不是对象时返回 `None`
    pub fn parse(content: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(content).ok()?;
        if !value.is_object() {
            return None;
        }
        Self::deserialize(&value).ok()
    }

    /// 读取目录下的 `package.json`
    pub async fn read(dir: &Path) -> Option<Self> {
        let content = tokio::fs::read_to_string(dir.join(PACKAGE_JSON)).await.ok()?;
        Self::parse(&content)
    }

    /// 依赖或开发依赖中是否声明了该包（只看键，不看版本）
    pub fn has_dependency(&self, package: &str) -> bool {
        [&self.dependencies, &self.dev_dependencies]
            .into_iter()
            .flatten()
            .any(|deps| deps.contains_key(package))
    }

    /// 该包声明的版本字符串，生产依赖优先
    pub fn dependency_version(&self, package: &str) -> Option<&str> {
        [&self.dependencies, &self.dev_dependencies]
            .into_iter()
            .flatten()
            .find_map(|deps| deps.get(package))
            .and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IosConfig {
    #[serde(default, deserialize_with = "lenient")]
    pub bundle_identifier: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AndroidConfig {
    #[serde(default, deserialize_with = "lenient")]
    pub package: Option<String>,
}

impl IosConfig {
    fn or(self, fallback: IosConfig) -> IosConfig {
        IosConfig {
            bundle_identifier: self.bundle_identifier.or(fallback.bundle_identifier),
        }
    }
}

impl AndroidConfig {
    fn or(self, fallback: AndroidConfig) -> AndroidConfig {
        AndroidConfig {
            package: self.package.or(fallback.package),
        }
    }
}

/// 两个可选的平台配置块按字段合并
fn merge_block<T>(primary: Option<T>, fallback: Option<T>, merge: fn(T, T) -> T) -> Option<T> {
    match (primary, fallback) {
        (Some(primary), Some(fallback)) => Some(merge(primary, fallback)),
        (primary, fallback) => primary.or(fallback),
    }
}

/// `app.json` 中的 Expo 配置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpoConfig {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub slug: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub scheme: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub version: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub sdk_version: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub new_arch_enabled: Option<bool>,

    #[serde(default, deserialize_with = "lenient")]
    pub icon: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub orientation: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub platforms: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient")]
    pub background_color: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub primary_color: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub ios: Option<IosConfig>,

    #[serde(default, deserialize_with = "lenient")]
    pub android: Option<AndroidConfig>,

    #[serde(default, deserialize_with = "lenient")]
    pub permissions: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient")]
    pub splash: Option<Map<String, Value>>,

    #[serde(default, deserialize_with = "lenient")]
    pub updates: Option<Map<String, Value>>,

    #[serde(default, deserialize_with = "lenient")]
    pub plugins: Option<Vec<Value>>,

    #[serde(default, deserialize_with = "lenient")]
    pub extra: Option<Map<String, Value>>,
}

impl ExpoConfig {
    /// 解析 `app.json`：嵌套在 `expo` 键下的字段优先，逐字段回退到顶层
    pub fn from_app_json(content: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(content).ok()?;

        let root = Self::from_value(&value);
        let nested = value
            .get(EXPO_CONFIG_KEY)
            .map(Self::from_value)
            .unwrap_or_default();

        Some(nested.or(root))
    }

    /// 读取目录下的 `app.json`，不存在或无法解析时返回 `None`
    pub async fn read(dir: &Path) -> Option<Self> {
        let content = tokio::fs::read_to_string(dir.join(APP_JSON)).await.ok()?;
        Self::from_app_json(&content)
    }

    fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        Self::deserialize(value).unwrap_or_default()
    }

    /// 逐字段合并，`self` 中缺失的字段取 `fallback` 的值
    pub fn or(self, fallback: ExpoConfig) -> ExpoConfig {
        ExpoConfig {
            name: self.name.or(fallback.name),
            slug: self.slug.or(fallback.slug),
            scheme: self.scheme.or(fallback.scheme),
            version: self.version.or(fallback.version),
            sdk_version: self.sdk_version.or(fallback.sdk_version),
            new_arch_enabled: self.new_arch_enabled.or(fallback.new_arch_enabled),
            icon: self.icon.or(fallback.icon),
            orientation: self.orientation.or(fallback.orientation),
            platforms: self.platforms.or(fallback.platforms),
            background_color: self.background_color.or(fallback.background_color),
            primary_color: self.primary_color.or(fallback.primary_color),
            ios: merge_block(self.ios, fallback.ios, IosConfig::or),
            android: merge_block(self.android, fallback.android, AndroidConfig::or),
            permissions: self.permissions.or(fallback.permissions),
            splash: self.splash.or(fallback.splash),
            updates: self.updates.or(fallback.updates),
            plugins: self.plugins.or(fallback.plugins),
            extra: self.extra.or(fallback.extra),
        }
    }

    pub fn bundle_identifier(&self) -> Option<&str> {
        self.ios.as_ref()?.bundle_identifier.as_deref()
    }

    pub fn android_package(&self) -> Option<&str> {
        self.android.as_ref()?.package.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_manifest_dependency_lookup() {
        let manifest = PackageManifest::parse(
            r#"{"version":"1.2.0","dependencies":{"react":"18.0.0"},"devDependencies":{"expo":"^51.0.3"}}"#,
        )
        .unwrap();

        assert!(manifest.has_dependency("expo"));
        assert!(manifest.has_dependency("react"));
        assert!(!manifest.has_dependency("react-native"));
        assert_eq!(manifest.dependency_version("expo"), Some("^51.0.3"));
        assert_eq!(manifest.version.as_deref(), Some("1.2.0"));
    }

    #[test]
    fn test_package_manifest_wrong_field_types_degrade() {
        let manifest = PackageManifest::parse(
            r#"{"version": 3, "dependencies": ["expo"], "devDependencies": {"expo": "~50.0.0"}}"#,
        )
        .unwrap();

        assert_eq!(manifest.version, None);
        assert_eq!(manifest.dependencies, None);
        assert!(manifest.has_dependency("expo"));
    }

    #[test]
    fn test_package_manifest_rejects_invalid_json() {
        assert!(PackageManifest::parse("{ not json").is_none());
        assert!(PackageManifest::parse("[1, 2, 3]").is_none());
    }

    #[test]
    fn test_expo_config_nested_wins_per_field() {
        let config = ExpoConfig::from_app_json(
            r#"{
                "name": "RootName",
                "orientation": "portrait",
                "expo": { "name": "NestedName", "slug": "nested" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.name.as_deref(), Some("NestedName"));
        assert_eq!(config.slug.as_deref(), Some("nested"));
        // 嵌套配置中没有 orientation，回退到顶层
        assert_eq!(config.orientation.as_deref(), Some("portrait"));
    }

    #[test]
    fn test_expo_config_flat_layout() {
        let config = ExpoConfig::from_app_json(
            r#"{"name":"Flat","ios":{"bundleIdentifier":"com.example.flat"},"android":{"package":"com.example.flat"}}"#,
        )
        .unwrap();

        assert_eq!(config.name.as_deref(), Some("Flat"));
        assert_eq!(config.bundle_identifier(), Some("com.example.flat"));
        assert_eq!(config.android_package(), Some("com.example.flat"));
    }

    #[test]
    fn test_platform_blocks_merge_per_field() {
        let config = ExpoConfig::from_app_json(
            r#"{
                "ios": {"bundleIdentifier": "com.root"},
                "android": {"package": "com.root.android"},
                "expo": {
                    "ios": {"supportsTablet": true},
                    "android": {"package": "com.nested.android"}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.bundle_identifier(), Some("com.root"));
        assert_eq!(config.android_package(), Some("com.nested.android"));
    }

    #[test]
    fn test_expo_config_bad_types_are_dropped() {
        let config = ExpoConfig::from_app_json(
            r#"{"expo":{"name":42,"platforms":"ios","newArchEnabled":"yes","slug":"ok"}}"#,
        )
        .unwrap();

        assert_eq!(config.name, None);
        assert_eq!(config.platforms, None);
        assert_eq!(config.new_arch_enabled, None);
        assert_eq!(config.slug.as_deref(), Some("ok"));
    }
}
