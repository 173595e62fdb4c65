use std::path::{Path, PathBuf};

const FILE_URI_PREFIX: &str = "file://";

/// 把用户或宿主传入的根目录规范化为绝对路径
///
/// 去掉 `file://` 前缀，展开开头的 `~`，相对路径基于当前目录。
pub fn normalize_root(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let without_scheme = trimmed.strip_prefix(FILE_URI_PREFIX).unwrap_or(trimmed);

    let expanded = expand_home(without_scheme);
    std::path::absolute(&expanded).unwrap_or(expanded)
}

fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(path),
    };

    match dirs::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}

/// 路径中是否有某一段等于给定名称
pub fn has_segment<S: AsRef<str>>(path: &Path, names: &[S]) -> bool {
    path.components()
        .any(|c| names.iter().any(|name| c.as_os_str() == name.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_file_scheme() {
        assert_eq!(
            normalize_root("file:///Users/me/Developer"),
            PathBuf::from("/Users/me/Developer")
        );
        assert_eq!(normalize_root("/tmp/projects"), PathBuf::from("/tmp/projects"));
    }

    #[test]
    fn test_relative_becomes_absolute() {
        assert!(normalize_root("some/relative/dir").is_absolute());
    }

    #[test]
    fn test_expands_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(normalize_root("~/Code"), home.join("Code"));
            assert_eq!(normalize_root("~"), home);
        }
        // 不是 ~/ 开头的不展开
        assert!(normalize_root("~other").ends_with("~other"));
    }

    #[test]
    fn test_has_segment() {
        let names = ["node_modules", ".git"];
        let names = &names[..];
        assert!(has_segment(Path::new("a/node_modules/b.js"), names));
        assert!(has_segment(Path::new(".git/HEAD"), names));
        assert!(!has_segment(Path::new("src/.github/ci.yml"), names));
        assert!(!has_segment(Path::new("my_node_modules_notes.md"), names));
    }
}
