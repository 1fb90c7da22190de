//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/auth` - 로그인, 가입, 토큰 재발급, 현재 사용자
//! - `/categorias` - 카테고리 관리
//! - `/productos` - 상품 관리
//! - `/documentacion/swagger.json` - OpenAPI 문서

pub mod auth;
pub mod categories;
pub mod health;
pub mod products;

pub use auth::{auth_router, AuthResponse, LoginRequest, MeResponse, RefreshResponse, RegisterRequest};
pub use categories::{categories_router, CategoryRequest};
pub use health::{health_router, HealthResponse, StoreStatus};
pub use products::{products_router, ProductRequest};

use axum::Router;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::openapi::openapi_router;
use crate::state::AppState;

/// 삭제 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    pub message: String,
    pub id: i64,
}

impl DeletedResponse {
    pub fn new(message: impl Into<String>, id: i64) -> Self {
        Self {
            message: message.into(),
            id,
        }
    }
}

/// 필수 텍스트 필드.
///
/// 누락이나 빈 문자열은 `None`입니다.
pub(crate) fn required_text(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        // 헬스 체크 엔드포인트
        .merge(health_router())
        // 인증
        .merge(auth_router())
        // 리소스
        .merge(categories_router())
        .merge(products_router())
        // 문서
        .merge(openapi_router())
}
