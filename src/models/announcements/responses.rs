use super::entities::Announcement;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct AnnouncementView {
    #[serde(flatten)]
    #[ts(flatten)]
    pub announcement: Announcement,
    pub author_name: String,
    pub is_read: bool,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct AnnouncementListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<AnnouncementView>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct UnreadCountResponse {
    pub unread_count: u64,
}
