pub mod download;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::path::Path;
use std::sync::Arc;

use crate::storage::Storage;

pub struct FileService {
    storage: Option<Arc<dyn Storage>>,
}

impl FileService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 上传附件
    pub async fn handle_upload(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        upload::handle_upload(self, request, payload).await
    }

    // 按令牌下载
    pub async fn handle_download(
        &self,
        request: &HttpRequest,
        file_token: String,
    ) -> ActixResult<HttpResponse> {
        download::handle_download(self, request, file_token).await
    }
}

/// 取小写扩展名（含点），没有扩展名时为空串
pub(crate) fn file_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

/// 扩展名是否在白名单中，白名单项可写 ".pdf" 或 "pdf"
pub(crate) fn extension_allowed(extension: &str, allowed: &[String]) -> bool {
    if extension.is_empty() {
        return false;
    }
    allowed.iter().any(|t| {
        let t = t.trim().to_lowercase();
        let t = if t.starts_with('.') { t } else { format!(".{t}") };
        t == extension
    })
}

/// 下载头中的文件名，去掉引号与控制字符
pub(crate) fn attachment_header(file_name: &str) -> String {
    let cleaned: String = file_name
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    let cleaned = if cleaned.trim().is_empty() {
        "download".to_string()
    } else {
        cleaned
    };
    format!("attachment; filename=\"{cleaned}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_lowercased() {
        assert_eq!(file_extension("Justificatif.PDF"), ".pdf");
        assert_eq!(file_extension("archive.tar.gz"), ".gz");
        assert_eq!(file_extension("README"), "");
    }

    #[test]
    fn allow_list_accepts_both_spellings() {
        let allowed = vec![".pdf".to_string(), "PNG".to_string()];
        assert!(extension_allowed(".pdf", &allowed));
        assert!(extension_allowed(".png", &allowed));
        assert!(!extension_allowed(".exe", &allowed));
        assert!(!extension_allowed("", &allowed));
    }

    #[test]
    fn attachment_header_strips_quotes() {
        assert_eq!(
            attachment_header("note \"final\".pdf"),
            "attachment; filename=\"note final.pdf\""
        );
        assert_eq!(attachment_header("\n"), "attachment; filename=\"download\"");
    }
}
