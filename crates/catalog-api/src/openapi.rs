//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! 문서는 `/documentacion/swagger.json`에서 JSON으로만 제공하며, UI는 렌더링하지 않습니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::{routing::get, Json, Router};
use catalog_core::{Category, Product, UserProfile};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::ApiErrorResponse;
use crate::routes::{
    AuthResponse, CategoryRequest, DeletedResponse, HealthResponse, StoreStatus,
    LoginRequest, MeResponse, ProductRequest, RefreshResponse, RegisterRequest,
};

// ==================== OpenAPI 문서 정의 ====================

/// Catalog API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tienda Online Catalog API",
        description = r#"
# 카테고리/상품 카탈로그 REST API

## 인증

생성/수정/삭제 엔드포인트와 `/auth/me`는 Access Token이 필요합니다.
`Authorization: Bearer <token>` 헤더를 포함하세요.
`/auth/refresh`는 Refresh Token을 같은 방식으로 받습니다.
"#
    ),
    servers(
        (url = "http://localhost:5000", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "auth", description = "인증 - 로그인, 가입, 토큰 재발급"),
        (name = "categorias", description = "카테고리 CRUD"),
        (name = "productos", description = "상품 CRUD")
    ),
    modifiers(&SecurityAddon),
    // ==================== 스키마 등록 ====================
    components(
        schemas(
            // ===== Common =====
            ApiErrorResponse,
            DeletedResponse,

            // ===== Health =====
            HealthResponse,
            StoreStatus,

            // ===== Auth =====
            LoginRequest,
            RegisterRequest,
            AuthResponse,
            RefreshResponse,
            MeResponse,
            UserProfile,

            // ===== Catalog =====
            Category,
            CategoryRequest,
            Product,
            ProductRequest,
        )
    ),
    // ==================== 경로 등록 ====================
    paths(
        // ===== Health =====
        crate::routes::health::health_check,
        crate::routes::health::health_ready,

        // ===== Auth =====
        crate::routes::auth::login,
        crate::routes::auth::register,
        crate::routes::auth::refresh,
        crate::routes::auth::me,

        // ===== Categorias =====
        crate::routes::categories::list_categories,
        crate::routes::categories::get_category,
        crate::routes::categories::create_category,
        crate::routes::categories::update_category,
        crate::routes::categories::delete_category,

        // ===== Productos =====
        crate::routes::products::list_products,
        crate::routes::products::get_product,
        crate::routes::products::create_product,
        crate::routes::products::update_product,
        crate::routes::products::delete_product,
    )
)]
pub struct ApiDoc;

/// Bearer 토큰 보안 스키마 등록.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

// ==================== 문서 라우터 ====================

/// OpenAPI JSON
///
/// GET /documentacion/swagger.json
async fn swagger_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// 문서 라우터 생성.
pub fn openapi_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/documentacion/swagger.json", get(swagger_json))
}

// ==================== 테스트 ====================
