use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{
    ApiResponse,
    users::{
        entities::{UserRole, UserStatus},
        requests::{StaffQueryParams, UserListParams, UserListQuery, UserOrder},
        responses::StaffDirectoryResponse,
    },
};
use crate::services::internal_error;

pub async fn list_users(
    service: &UserService,
    query: UserListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = UserListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        roles: query.role.into_iter().collect(),
        status: query.status,
        search: query.search,
        order: UserOrder::Newest,
    };

    match storage.list_users_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "User list retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve user list", e)),
    }
}

/// 教职工通讯录：在职的教学人员与教务处
pub async fn list_staff(
    service: &UserService,
    query: StaffQueryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = UserListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        roles: vec![UserRole::User, UserRole::AcademicOffice],
        status: Some(UserStatus::Active),
        search: query.search,
        order: UserOrder::Name,
    };

    match storage.list_users_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StaffDirectoryResponse {
                items: response.items.into_iter().map(Into::into).collect(),
                pagination: response.pagination,
            },
            "Staff directory retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve staff directory", e)),
    }
}
