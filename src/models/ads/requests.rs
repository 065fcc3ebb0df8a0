use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/ad.ts")]
pub struct CreateAdRequest {
    pub title: String,
    pub content: String,
    pub image_token: Option<String>,
    pub link_url: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/ad.ts")]
pub struct UpdateAdRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image_token: Option<String>,
    pub link_url: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/ad.ts")]
pub struct AdListQuery {
    // 仅管理员生效
    pub include_inactive: Option<bool>,
}
