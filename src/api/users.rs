use actix_web::{web, HttpResponse};

use crate::config::AppConfig;
use crate::models::{User, UserDto};
use crate::patch::{parse_patch, PatchOperation};
use crate::services::UserService;
use crate::utils::error::AppError;

/// Success -> 200 with the user. Unknown ids -> 404, or 200 `null` when the
/// legacy behavior is switched on.
fn user_or_missing(result: Result<User, AppError>, config: &AppConfig) -> Result<HttpResponse, AppError> {
    match result {
        Ok(user) => Ok(HttpResponse::Ok().json(UserDto::from(user))),
        Err(AppError::NotFound(id)) if config.legacy_null_on_missing => {
            log::debug!("User {} not found, answering null (legacy mode)", id);
            Ok(HttpResponse::Ok().json(serde_json::Value::Null))
        }
        Err(e) => Err(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/v0/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users, ascending by id", body = Vec<UserDto>)
    )
)]
pub async fn list_users(service: web::Data<UserService>) -> Result<HttpResponse, AppError> {
    let users: Vec<UserDto> = service.list().await?.into_iter().map(UserDto::from).collect();
    Ok(HttpResponse::Ok().json(users))
}

#[utoipa::path(
    get,
    path = "/api/v0/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    service: web::Data<UserService>,
    config: web::Data<AppConfig>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    user_or_missing(service.get_by_id(id).await, &config)
}

#[utoipa::path(
    post,
    path = "/api/v0/users",
    tag = "Users",
    request_body = UserDto,
    responses(
        (status = 200, description = "User saved (an existing id is overwritten)", body = UserDto),
        (status = 400, description = "Malformed body or missing id")
    )
)]
pub async fn create_user(
    service: web::Data<UserService>,
    body: web::Json<UserDto>,
) -> Result<HttpResponse, AppError> {
    let dto = body.into_inner();
    let id = dto
        .id
        .ok_or_else(|| AppError::InvalidRequest("id is required".to_string()))?;
    let user = service.create(dto.into_user(id)).await?;
    Ok(HttpResponse::Ok().json(UserDto::from(user)))
}

#[utoipa::path(
    put,
    path = "/api/v0/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User id; overrides any id in the body")),
    request_body = UserDto,
    responses(
        (status = 200, description = "User replaced", body = UserDto),
        (status = 400, description = "Malformed body"),
        (status = 404, description = "User not found")
    )
)]
pub async fn replace_user(
    service: web::Data<UserService>,
    config: web::Data<AppConfig>,
    path: web::Path<i32>,
    body: web::Json<UserDto>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let user = body.into_inner().into_user(id);
    user_or_missing(service.replace(id, user).await, &config)
}

#[utoipa::path(
    patch,
    path = "/api/v0/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User id")),
    request_body(content = Vec<PatchOperation>, content_type = "application/json-patch+json"),
    responses(
        (status = 200, description = "Patch applied", body = UserDto),
        (status = 400, description = "Malformed patch, failed operation, or invalid result (empty body)"),
        (status = 404, description = "User not found")
    )
)]
pub async fn patch_user(
    service: web::Data<UserService>,
    config: web::Data<AppConfig>,
    path: web::Path<i32>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let operations = parse_patch(&body).map_err(|e| {
        log::warn!("⚠️  Malformed patch for user {}: {}", id, e);
        AppError::PatchFormat(e.to_string())
    })?;
    user_or_missing(service.patch_by_id(id, &operations).await, &config)
}

#[utoipa::path(
    delete,
    path = "/api/v0/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted, or never existed")
    )
)]
pub async fn delete_user(
    service: web::Data<UserService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    service.delete_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().finish())
}
