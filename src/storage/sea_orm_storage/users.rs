//! 用户存储操作

use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users, Model};
use crate::errors::{PortalError, Result};
use crate::models::{
    PaginationInfo,
    users::{
        entities::{User, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery, UserOrder},
        responses::UserListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Select, Set,
    sea_query::{Expr, LikeExpr},
};
use std::collections::HashMap;

/// 列表筛选：角色集合、账号状态、用户名 / 邮箱 / 显示名模糊搜索
fn list_condition(query: &UserListQuery) -> Condition {
    let mut condition = Condition::all();

    if !query.roles.is_empty() {
        condition = condition.add(
            Column::Role.is_in(query.roles.iter().map(|r| r.to_string()).collect::<Vec<_>>()),
        );
    }
    if let Some(status) = &query.status {
        condition = condition.add(Column::Status.eq(status.to_string()));
    }
    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", escape_like_pattern(search));
        let like = || LikeExpr::new(pattern.clone()).escape('\\');
        condition = condition.add(
            Condition::any()
                .add(Column::Username.like(like()))
                .add(Column::Email.like(like()))
                .add(Column::DisplayName.like(like())),
        );
    }

    condition
}

fn ordered(select: Select<Users>, order: UserOrder) -> Select<Users> {
    match order {
        UserOrder::Newest => select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id),
        // 未设置显示名的按用户名排在一起
        UserOrder::Name => select
            .order_by_asc(Expr::cust("COALESCE(display_name, username)"))
            .order_by_asc(Column::Id),
    }
}

impl SeaOrmStorage {
    async fn find_user(&self, condition: Condition) -> Result<Option<User>> {
        let found = Users::find()
            .filter(condition)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(found.map(Model::into_user))
    }

    /// 新账号一律为 active，密码字段已是哈希
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let created = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            display_name: Set(req.display_name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| PortalError::db_write("创建用户失败", e))?;

        Ok(created.into_user())
    }

    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        self.find_user(Condition::all().add(Column::Id.eq(id))).await
    }

    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        self.find_user(Condition::all().add(Column::Username.eq(username)))
            .await
    }

    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        self.find_user(Condition::all().add(Column::Email.eq(email)))
            .await
    }

    /// 登录标识可以是用户名或邮箱
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        self.find_user(
            Condition::any()
                .add(Column::Username.eq(identifier))
                .add(Column::Email.eq(identifier)),
        )
        .await
    }

    /// 管理列表与教职工通讯录共用的分页查询
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let (page, size) = PaginationInfo::normalize(query.page, query.size, 10);

        let select = ordered(Users::find().filter(list_condition(&query)), query.order);
        let paginator = select.paginate(&self.db, size);

        let counts = paginator
            .num_items_and_pages()
            .await
            .map_err(|e| PortalError::database_operation(format!("统计用户失败: {e}")))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(UserListResponse {
            items: rows.into_iter().map(Model::into_user).collect(),
            pagination: PaginationInfo::new(
                page,
                size,
                counts.number_of_items,
                counts.number_of_pages,
            ),
        })
    }

    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(Column::LastLogin, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新最后登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 只写入请求中出现的字段；用户不存在时返回 None
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        let Some(current) = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询用户失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = current.into();
        if let Some(email) = update.email {
            model.email = Set(email);
        }
        if let Some(password_hash) = update.password {
            model.password_hash = Set(password_hash);
        }
        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(display_name) = update.display_name {
            // 空字符串视为清除显示名
            let display_name = display_name.trim().to_string();
            model.display_name = Set((!display_name.is_empty()).then_some(display_name));
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| PortalError::db_write("更新用户失败", e))?;

        Ok(Some(updated.into_user()))
    }

    /// 删除用户，选课记录与成绩随外键级联删除
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("删除用户失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("统计用户数量失败: {e}")))
    }

    /// 批量获取用户，用于为列表补全姓名
    pub(crate) async fn users_by_ids(&self, ids: Vec<i64>) -> Result<HashMap<i64, Model>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let users = Users::find()
            .filter(Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use sea_orm::{DbBackend, QueryTrait};

    fn sql(query: UserListQuery) -> String {
        ordered(Users::find().filter(list_condition(&query)), query.order)
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn staff_directory_filters_roles_and_status() {
        let text = sql(UserListQuery {
            roles: vec![UserRole::User, UserRole::AcademicOffice],
            status: Some(UserStatus::Active),
            order: UserOrder::Name,
            ..Default::default()
        });
        assert!(text.contains(r#""role" IN ('user', 'academic_office')"#));
        assert!(text.contains(r#""status" = 'active'"#));
        assert!(text.contains("COALESCE(display_name, username)"));
    }

    #[test]
    fn search_escapes_wildcards() {
        let text = sql(UserListQuery {
            search: Some(" 50%_off ".to_string()),
            ..Default::default()
        });
        assert_eq!(text.matches(" LIKE ").count(), 3);
        assert_eq!(text.matches(" ESCAPE ").count(), 3);
        assert!(!text.contains(r#""role""#));
    }
}
