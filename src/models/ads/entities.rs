use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/ad.ts")]
pub struct Advertisement {
    pub id: i64,
    pub title: String,
    pub content: String,
    // 图片文件的下载令牌
    pub image_token: Option<String>,
    pub link_url: Option<String>,
    pub is_active: bool,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
