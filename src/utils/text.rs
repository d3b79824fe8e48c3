/// 取文件扩展名，没有扩展名时返回默认值
pub fn extension_of(file_name: &str, default: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.trim().is_empty() => ext.trim().to_string(),
        _ => default.to_string(),
    }
}

/// 按扩展名推断 MIME 类型
pub fn mime_type_for(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("photo.PNG", "jpg"), "PNG");
        assert_eq!(extension_of("archive.tar.gz", "jpg"), "gz");
        assert_eq!(extension_of("noext", "jpg"), "jpg");
        assert_eq!(extension_of("trailing.", "jpg"), "jpg");
    }

    #[test]
    fn test_mime_type_for() {
        assert_eq!(mime_type_for("JPG"), "image/jpeg");
        assert_eq!(mime_type_for("webp"), "image/webp");
        assert_eq!(mime_type_for("xyz"), "application/octet-stream");
    }
}
