use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

use super::{FileService, extension_allowed, file_extension};
use crate::config::AppConfig;
use crate::errors::PortalError;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, files::responses::FileUploadResponse};
use crate::services::unauthorized;
use crate::utils::validate_magic_bytes;

fn upload_failed(msg: &str) -> HttpResponse {
    HttpResponse::InternalServerError()
        .json(ApiResponse::error_empty(ErrorCode::FileUploadFailed, msg))
}

pub async fn handle_upload(
    service: &FileService,
    req: &HttpRequest,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(req) else {
        return Ok(unauthorized());
    };

    let config = AppConfig::get();
    let upload_dir = Path::new(&config.upload.dir);
    let max_size = config.upload.max_size;

    if !upload_dir.exists()
        && let Err(e) = fs::create_dir_all(upload_dir)
    {
        tracing::error!("{}", PortalError::file_operation(format!("{e}")));
        return Ok(upload_failed("Failed to prepare upload directory"));
    }

    let mut original_name = String::new();
    let mut file_size: i64 = 0;
    let mut file_uploaded = false;
    let mut file_type = String::new();
    let mut stored_name = String::new();

    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        if name != "file" {
            continue;
        }
        if file_uploaded {
            if !stored_name.is_empty() {
                let _ = fs::remove_file(upload_dir.join(&stored_name));
            }
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::MultifileUploadNotAllowed,
                "Only one file can be uploaded at a time",
            )));
        }
        file_uploaded = true;

        original_name = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let extension = file_extension(&original_name);
        if !extension_allowed(&extension, &config.upload.allowed_types) {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::FileTypeNotAllowed,
                "File type not allowed",
            )));
        }

        // MIME 仅用于下载时回写，不参与校验
        file_type = field
            .content_type()
            .map(|ct| ct.to_string())
            .unwrap_or_default();

        stored_name = format!("{}-{}.bin", chrono::Utc::now().timestamp(), Uuid::new_v4());
        let file_path = upload_dir.join(&stored_name);
        let mut f = match File::create(&file_path) {
            Ok(file) => file,
            Err(e) => {
                tracing::error!("{}", PortalError::file_operation(format!("{e}")));
                return Ok(upload_failed("Failed to create file"));
            }
        };

        let mut total_size: usize = 0;
        let mut first_chunk = true;
        while let Some(chunk) = field.next().await {
            let data = match chunk {
                Ok(data) => data,
                Err(e) => {
                    let _ = fs::remove_file(&file_path);
                    return Err(e.into());
                }
            };

            if first_chunk {
                first_chunk = false;
                if !validate_magic_bytes(&data, &extension) {
                    let _ = fs::remove_file(&file_path);
                    return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                        ErrorCode::FileTypeNotAllowed,
                        "File content does not match its extension",
                    )));
                }
            }

            total_size += data.len();
            if total_size > max_size {
                let _ = fs::remove_file(&file_path);
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::FileSizeExceeded,
                    format!("File size exceeds the limit of {max_size} bytes"),
                )));
            }
            if let Err(e) = f.write_all(&data) {
                let _ = fs::remove_file(&file_path);
                tracing::error!("{}", PortalError::file_operation(format!("{e}")));
                return Ok(upload_failed("Failed to write file"));
            }
        }
        file_size = total_size as i64;
    }

    if !file_uploaded {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::FileNotFound,
            "No file found in upload payload",
        )));
    }

    let storage = service.get_storage(req)?;
    let download_token = Uuid::new_v4().simple().to_string();

    match storage
        .upload_file(
            &download_token,
            &original_name,
            &stored_name,
            file_size,
            &file_type,
            user_id,
        )
        .await
    {
        Ok(file) => {
            tracing::info!(
                "User {} uploaded {} ({} bytes)",
                user_id,
                file.original_name,
                file.file_size
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                FileUploadResponse {
                    download_token: file.download_token,
                    file_name: file.original_name,
                    size: file.file_size,
                    content_type: file.file_type,
                    created_at: file.created_at,
                },
                "File uploaded successfully",
            )))
        }
        Err(e) => {
            let _ = fs::remove_file(upload_dir.join(&stored_name));
            tracing::error!("Failed to save file record: {}", e);
            Ok(upload_failed("Failed to save file record"))
        }
    }
}
