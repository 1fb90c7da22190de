//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.
//!
//! ```json
//! {
//!   "error": "Categoría no encontrada",
//!   "code": "CATEGORY_NOT_FOUND"
//! }
//! ```
//!
//! 저장소/토큰/해싱 실패는 내부 정보를 노출하지 않고 일반 메시지로 응답하며,
//! 원인은 로그로만 남깁니다.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;
use validator::ValidationErrors;

use crate::auth::{JwtAuthError, JwtError, PasswordError};
use crate::guard::GuardError;
use crate::repository::StoreError;

/// 에러 응답 본문.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 사람이 읽을 수 있는 에러 메시지
    pub error: String,
    /// 에러 코드 (예: "VALIDATION_ERROR", "NOT_FOUND")
    pub code: String,
}

impl ApiErrorResponse {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}

/// API 에러.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 필수 필드 누락/형식 오류 (400)
    #[error("{0}")]
    Validation(String),

    /// 자격증명 불일치 (401)
    #[error("{0}")]
    Unauthorized(String),

    /// 토큰 추출기 거부 (401 / 422)
    #[error(transparent)]
    Auth(#[from] JwtAuthError),

    /// 대상 리소스 없음 (404)
    #[error("{0}")]
    NotFound(String),

    /// 참조 카테고리 없음 (404)
    #[error("Categoría no encontrada")]
    CategoryNotFound,

    /// 고유성 충돌 (409)
    #[error("{0}")]
    Conflict(String),

    /// 저장소 실패 (500). 메시지는 작업 단위의 일반 문구입니다.
    #[error("{message}")]
    Storage {
        message: &'static str,
        #[source]
        source: StoreError,
    },

    /// 토큰 발급 실패 (500)
    #[error("Error interno del servidor")]
    Token(#[source] JwtError),

    /// 비밀번호 해싱 실패 (500)
    #[error("Error interno del servidor")]
    Password(#[from] PasswordError),
}

impl ApiError {
    /// 저장소 에러를 응답용 메시지로 감쌉니다.
    ///
    /// ```rust,ignore
    /// state.categories.list().await.map_err(ApiError::storage("Error al obtener categorías"))?;
    /// ```
    pub fn storage(message: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |source| ApiError::Storage { message, source }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    /// HTTP 상태 코드.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Auth(e) => e.status_and_code().0,
            ApiError::NotFound(_) | ApiError::CategoryNotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Storage { .. } | ApiError::Token(_) | ApiError::Password(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 에러 코드.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Auth(e) => e.status_and_code().1,
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::CategoryNotFound => "CATEGORY_NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Storage { .. } => "STORAGE_ERROR",
            ApiError::Token(_) | ApiError::Password(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Storage { message, source } => {
                error!(operation = %message, error = %source, "Storage operation failed");
            }
            ApiError::Token(e) => error!(error = %e, "Token issuance failed"),
            ApiError::Password(e) => error!(error = %e, "Password hashing failed"),
            _ => {}
        }

        let body = Json(ApiErrorResponse::new(self.code(), self.to_string()));
        (self.status(), body).into_response()
    }
}

/// 서명 실패만 서버 오류이고, 나머지는 제시된 토큰의 문제입니다.
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Encoding(_) => ApiError::Token(err),
            rejected => ApiError::Auth(JwtAuthError::from(rejected)),
        }
    }
}

impl From<GuardError> for ApiError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::CategoryNotFound(_) => ApiError::CategoryNotFound,
            GuardError::Store(source) => ApiError::Storage {
                message: "Error al verificar la categoría",
                source,
            },
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors: Vec<_> = errors.field_errors().into_iter().collect();
        field_errors.sort_by(|a, b| a.0.cmp(&b.0));

        let message = field_errors
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{}: valor inválido", field))
                })
            })
            .collect::<Vec<_>>()
            .join("; ");

        ApiError::Validation(message)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
        ApiError::Validation("Cuerpo de la solicitud inválido".to_string())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected path parameter");
        ApiError::NotFound("Recurso no encontrado".to_string())
    }
}

/// JSON 본문 추출기.
///
/// 역직렬화 실패도 JSON 에러 본문(400)으로 응답합니다.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// 경로 파라미터 추출기.
///
/// 정수가 아닌 id는 일치하는 리소스가 없는 것으로 취급합니다 (404).
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_category_not_found_body() {
        let response = ApiError::from(GuardError::CategoryNotFound(9999)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Categoría no encontrada");
        assert_eq!(body["code"], "CATEGORY_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_storage_error_is_generic() {
        let err = ApiError::storage("Error al obtener categorías")(StoreError::Unavailable(
            "connection refused to 10.0.0.5:5432".to_string(),
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Error al obtener categorías");
        assert_eq!(body["code"], "STORAGE_ERROR");
        assert!(!body.to_string().contains("10.0.0.5"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Unauthorized("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Auth(JwtAuthError::InvalidToken).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Auth(JwtAuthError::MissingToken).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_jwt_error_conversion() {
        let mismatch = ApiError::from(JwtError::TokenKindMismatch {
            expected: crate::auth::TokenKind::Refresh,
            found: crate::auth::TokenKind::Access,
        });
        assert_eq!(mismatch.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(mismatch.code(), "WRONG_TOKEN_KIND");

        assert_eq!(
            ApiError::from(JwtError::TokenExpired).status(),
            StatusCode::UNAUTHORIZED
        );

        let encoding = ApiError::from(JwtError::Encoding(
            jsonwebtoken::errors::ErrorKind::InvalidKeyFormat.into(),
        ));
        assert_eq!(encoding.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(encoding.code(), "INTERNAL_ERROR");
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 6, message = "Demasiado corto"))]
        password: String,
        #[validate(length(max = 3))]
        name: String,
    }

    #[test]
    fn test_validation_errors_message() {
        let sample = Sample {
            password: "abc".to_string(),
            name: "abcdef".to_string(),
        };
        let err = ApiError::from(sample.validate().unwrap_err());

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "name: valor inválido; Demasiado corto");
    }
}
