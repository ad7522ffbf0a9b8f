use crate::utils::error::{Result, WardrobeError};
use regex::Regex;
use std::sync::OnceLock;

/// 允許上傳的圖片副檔名
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "heic", "webp"];

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(WardrobeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(WardrobeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(WardrobeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(WardrobeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(WardrobeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 副檔名不分大小寫比對
pub fn is_allowed_image(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

pub fn validate_image_filename(filename: &str) -> Result<()> {
    if filename.trim().is_empty() {
        return Err(WardrobeError::UploadError {
            message: "No file selected".to_string(),
        });
    }
    if !is_allowed_image(filename) {
        return Err(WardrobeError::UploadError {
            message: format!(
                "Unsupported file type: {}. Allowed extensions: {}",
                filename,
                ALLOWED_IMAGE_EXTENSIONS.join(", ")
            ),
        });
    }
    Ok(())
}

/// 把使用者提供的檔名轉成安全的單一路徑片段
///
/// 只保留 ASCII 英數與 `.` `_` `-`，空白轉成 `_`，並去掉開頭的 `.`/`_`。
/// 結果可能是空字串，呼叫端需自行補預設檔名。
pub fn secure_filename(filename: &str) -> String {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    let unsafe_chars = UNSAFE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("valid regex"));

    // 只取最後一段，避免 ../ 或 Windows 路徑
    let base = filename.rsplit(['/', '\\']).next().unwrap_or_default();
    let spaced: String = base.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = unsafe_chars.replace_all(&spaced, "");

    cleaned.trim_start_matches(['.', '_']).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("max_attempts", 5, 1).is_ok());
        assert!(validate_positive_number("max_attempts", 0, 1).is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("data_dir", "./data").is_ok());
        assert!(validate_path("data_dir", "").is_err());
        assert!(validate_path("data_dir", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("port", 5000u16, 1, 65535).is_ok());
        assert!(validate_range("port", 0u16, 1, 65535).is_err());
    }

    #[test]
    fn test_allowed_image_extensions() {
        assert!(is_allowed_image("shirt.jpg"));
        assert!(is_allowed_image("IMG_0001.HEIC"));
        assert!(is_allowed_image("pants.final.webp"));
        assert!(!is_allowed_image("notes.txt"));
        assert!(!is_allowed_image("jpg"));
        assert!(validate_image_filename("").is_err());
        assert!(validate_image_filename("archive.zip").is_err());
    }

    #[test]
    fn test_secure_filename() {
        assert_eq!(secure_filename("My Shirt.jpg"), "My_Shirt.jpg");
        assert_eq!(secure_filename("../../etc/passwd"), "passwd");
        assert_eq!(secure_filename("C:\\photos\\pants.png"), "pants.png");
        assert_eq!(secure_filename(".hidden.gif"), "hidden.gif");
        assert_eq!(secure_filename("襯衫.jpg"), "jpg");
        assert_eq!(secure_filename("..."), "");
    }
}
