//! 카테고리 API 라우트.
//!
//! # 엔드포인트
//!
//! - `GET /categorias/` - 전체 목록 (공개)
//! - `GET /categorias/{id}` - 단건 조회 (공개)
//! - `POST /categorias/` - 생성 (인증)
//! - `PUT /categorias/{id}` - 전체 수정 (인증)
//! - `DELETE /categorias/{id}` - 삭제 (인증)
//!
//! 카테고리 삭제 시 참조하는 상품은 확인하지 않습니다.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use catalog_core::{Category, CategoryFields};
use serde::Deserialize;
use tracing::{debug, info};
use utoipa::ToSchema;
use validator::Validate;

use super::{required_text, DeletedResponse};
use crate::auth::JwtAuth;
use crate::error::{ApiError, ApiErrorResponse, ApiJson, ApiPath, ApiResult};
use crate::state::AppState;

const NOT_FOUND_MESSAGE: &str = "Categoría no encontrada";

// ==================== Request 타입 ====================

/// 카테고리 생성/수정 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryRequest {
    /// 카테고리 이름 (필수)
    #[validate(length(max = 255, message = "El nombre no puede superar 255 caracteres"))]
    pub nombre: Option<String>,
}

impl CategoryRequest {
    /// 필수 필드 확인 후 형식 검증.
    pub fn into_fields(self) -> ApiResult<CategoryFields> {
        if required_text(&self.nombre).is_none() {
            return Err(ApiError::validation("El nombre es requerido"));
        }
        self.validate()?;

        Ok(CategoryFields {
            name: self.nombre.unwrap_or_default(),
        })
    }
}

// ==================== 라우터 ====================

/// 카테고리 라우터 생성.
///
/// 목록/생성은 `/categorias`와 `/categorias/` 모두에서 받습니다.
pub fn categories_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/categorias", get(list_categories).post(create_category))
        .route("/categorias/", get(list_categories).post(create_category))
        .route(
            "/categorias/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
}

// ==================== 핸들러 ====================

/// 카테고리 목록
///
/// GET /categorias/
#[utoipa::path(
    get,
    path = "/categorias/",
    responses(
        (status = 200, description = "카테고리 목록", body = Vec<Category>),
        (status = 500, description = "서버 오류", body = ApiErrorResponse)
    ),
    tag = "categorias"
)]
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Category>>> {
    let categories = state
        .categories
        .list()
        .await
        .map_err(ApiError::storage("Error al obtener categorías"))?;

    debug!(count = categories.len(), "Listed categories");
    Ok(Json(categories))
}

/// 카테고리 단건 조회
///
/// GET /categorias/{id}
#[utoipa::path(
    get,
    path = "/categorias/{id}",
    params(("id" = i64, Path, description = "카테고리 ID")),
    responses(
        (status = 200, description = "카테고리", body = Category),
        (status = 404, description = "없음", body = ApiErrorResponse)
    ),
    tag = "categorias"
)]
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Category>> {
    state
        .categories
        .get(id)
        .await
        .map_err(ApiError::storage("Error al obtener la categoría"))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND_MESSAGE))
}

/// 카테고리 생성
///
/// POST /categorias/
#[utoipa::path(
    post,
    path = "/categorias/",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "생성됨", body = Category),
        (status = 400, description = "필수 필드 누락", body = ApiErrorResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "categorias"
)]
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    JwtAuth(identity): JwtAuth,
    ApiJson(request): ApiJson<CategoryRequest>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let fields = request.into_fields()?;

    let category = state
        .categories
        .create(fields)
        .await
        .map_err(ApiError::storage("Error al crear la categoría"))?;

    info!(user_id = identity.user_id, category_id = category.id, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// 카테고리 수정 (전체 교체)
///
/// PUT /categorias/{id}
#[utoipa::path(
    put,
    path = "/categorias/{id}",
    params(("id" = i64, Path, description = "카테고리 ID")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "수정됨", body = Category),
        (status = 400, description = "필수 필드 누락", body = ApiErrorResponse),
        (status = 404, description = "없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "categorias"
)]
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    JwtAuth(identity): JwtAuth,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<CategoryRequest>,
) -> ApiResult<Json<Category>> {
    let fields = request.into_fields()?;

    let category = state
        .categories
        .update(id, fields)
        .await
        .map_err(ApiError::storage("Error al actualizar la categoría"))?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND_MESSAGE))?;

    info!(user_id = identity.user_id, category_id = id, "Category updated");
    Ok(Json(category))
}

/// 카테고리 삭제
///
/// DELETE /categorias/{id}
#[utoipa::path(
    delete,
    path = "/categorias/{id}",
    params(("id" = i64, Path, description = "카테고리 ID")),
    responses(
        (status = 200, description = "삭제됨", body = DeletedResponse),
        (status = 404, description = "없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "categorias"
)]
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    JwtAuth(identity): JwtAuth,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    let deleted = state
        .categories
        .delete(id)
        .await
        .map_err(ApiError::storage("Error al eliminar la categoría"))?;

    if !deleted {
        return Err(ApiError::not_found(NOT_FOUND_MESSAGE));
    }

    info!(user_id = identity.user_id, category_id = id, "Category deleted");
    Ok(Json(DeletedResponse::new("Categoría eliminada", id)))
}
