use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/file.ts")]
pub struct File {
    // 下载令牌
    pub download_token: String,
    // 上传时的原始文件名
    pub original_name: String,
    // 磁盘上的文件名
    #[serde(skip_serializing)]
    #[ts(skip)]
    pub stored_name: String,
    // 字节数
    pub file_size: i64,
    pub file_type: String,
    pub user_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
