/// 校验文件头魔术字节与扩展名是否一致
///
/// `extension` 包含点号，如 ".png"。纯文本类型不做检查，未知扩展名一律拒绝。
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    const ZIP: &[u8] = &[0x50, 0x4B, 0x03, 0x04];
    const OLE: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

    match extension.to_lowercase().as_str() {
        // 广告图片、头像
        ".png" => data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
        ".jpg" | ".jpeg" => data.starts_with(&[0xFF, 0xD8, 0xFF]),
        ".gif" => data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a"),
        ".webp" => data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP",

        // 证明材料、课程资料
        ".pdf" => data.starts_with(b"%PDF"),
        ".doc" | ".xls" | ".ppt" => data.starts_with(OLE),
        ".docx" | ".xlsx" | ".pptx" | ".zip" => data.starts_with(ZIP),

        ".txt" | ".md" | ".csv" => true,

        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_and_jpeg() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert!(validate_magic_bytes(&png, ".png"));
        assert!(validate_magic_bytes(&png, ".PNG"));
        assert!(!validate_magic_bytes(&png, ".jpg"));
        assert!(validate_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0], ".jpeg"));
    }

    #[test]
    fn justification_documents() {
        assert!(validate_magic_bytes(b"%PDF-1.7", ".pdf"));
        assert!(!validate_magic_bytes(b"%PDF-1.7", ".docx"));
        assert!(validate_magic_bytes(&[0x50, 0x4B, 0x03, 0x04, 0x14], ".docx"));
    }

    #[test]
    fn renamed_executable_is_rejected() {
        let elf = [0x7F, b'E', b'L', b'F'];
        assert!(!validate_magic_bytes(&elf, ".pdf"));
        assert!(!validate_magic_bytes(&elf, ".exe"));
    }

    #[test]
    fn empty_data() {
        assert!(!validate_magic_bytes(&[], ".txt"));
    }
}
