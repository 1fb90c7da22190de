//! 카탈로그 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 카테고리/상품 CRUD API
//! - 토큰 기반 인증 (Access/Refresh Token)
//! - 상품 → 카테고리 참조 검사
//! - 헬스 체크 및 OpenAPI 문서
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: 토큰 발급/검증 및 비밀번호 해싱
//! - [`repository`]: 저장소 트레이트와 PostgreSQL/인메모리 구현
//! - [`guard`]: 참조 무결성 검사
//! - [`error`]: API 에러 응답
//! - [`openapi`]: OpenAPI 문서

pub mod auth;
pub mod error;
pub mod guard;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod state;

pub use auth::{
    hash_password, verify_password, BearerToken, Identity, JwtAuth, JwtAuthError, TokenKind,
    TokenService,
};
pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use guard::{GuardError, ReferentialGuard};
pub use routes::create_api_router;
pub use state::{connect_pool, AppState};

#[cfg(any(test, feature = "test-utils"))]
pub use state::create_test_state;
