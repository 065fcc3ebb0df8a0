//! 广告实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "advertisements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    pub image_token: Option<String>,
    pub link_url: Option<String>,
    pub is_active: bool,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_advertisement(self) -> crate::models::ads::entities::Advertisement {
        use crate::models::ads::entities::Advertisement;

        Advertisement {
            id: self.id,
            title: self.title,
            content: self.content.unwrap_or_default(),
            image_token: self.image_token,
            link_url: self.link_url,
            is_active: self.is_active,
            created_by: self.created_by,
            created_at: super::ts(self.created_at),
            updated_at: super::ts(self.updated_at),
        }
    }
}
