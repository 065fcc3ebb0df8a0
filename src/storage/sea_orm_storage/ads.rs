//! 广告存储操作

use super::SeaOrmStorage;
use crate::entity::advertisements::{ActiveModel, Column, Entity as Advertisements};
use crate::errors::{PortalError, Result};
use crate::models::ads::{
    entities::Advertisement,
    requests::{CreateAdRequest, UpdateAdRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_ad_impl(&self, created_by: i64, req: CreateAdRequest) -> Result<Advertisement> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            title: Set(req.title),
            content: Set(Some(req.content)),
            image_token: Set(req.image_token),
            link_url: Set(req.link_url),
            is_active: Set(req.is_active.unwrap_or(true)),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("创建广告失败: {e}")))?;

        Ok(result.into_advertisement())
    }

    pub async fn get_ad_by_id_impl(&self, id: i64) -> Result<Option<Advertisement>> {
        let result = Advertisements::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询广告失败: {e}")))?;

        Ok(result.map(|m| m.into_advertisement()))
    }

    pub async fn list_ads_impl(&self, active_only: bool) -> Result<Vec<Advertisement>> {
        let mut select = Advertisements::find();
        if active_only {
            select = select.filter(Column::IsActive.eq(true));
        }

        let rows = select
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询广告列表失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_advertisement()).collect())
    }

    pub async fn update_ad_impl(&self, id: i64, update: UpdateAdRequest) -> Result<Option<Advertisement>> {
        if self.get_ad_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(content) = update.content {
            model.content = Set(Some(content));
        }
        if let Some(image_token) = update.image_token {
            model.image_token = Set(Some(image_token));
        }
        if let Some(link_url) = update.link_url {
            model.link_url = Set(Some(link_url));
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新广告失败: {e}")))?;

        Ok(Some(result.into_advertisement()))
    }

    pub async fn delete_ad_impl(&self, id: i64) -> Result<bool> {
        let result = Advertisements::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("删除广告失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
