use super::entities::Advertisement;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/ad.ts")]
pub struct AdListResponse {
    pub items: Vec<Advertisement>,
}
