use humansize::{FormatSizeOptions, DECIMAL};

/// 以十进制单位（kB/MB/GB）格式化字节数，保留一位小数
pub fn format_size(bytes: u64) -> String {
    let options = FormatSizeOptions::from(DECIMAL).decimal_places(1);
    humansize::format_size(bytes, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1_500_000), "1.5 MB");
        assert!(format_size(3_200_000_000).ends_with("GB"));
    }
}
