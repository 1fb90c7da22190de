//! Axum용 JWT 인증 추출기.
//!
//! 보호된 핸들러는 추출기를 인자로 받기만 하면 됩니다. 검증에 실패하면
//! 핸들러 본문이 실행되기 전에 요청이 거부됩니다.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::debug;

use super::jwt::{Identity, JwtError, TokenKind};
use crate::state::AppState;

/// Access Token 인증 추출기.
///
/// # 사용 예시
///
/// ```rust,ignore
/// async fn protected_handler(
///     JwtAuth(identity): JwtAuth,
/// ) -> impl IntoResponse {
///     format!("Authenticated user: {}", identity.user_id)
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct JwtAuth(pub Identity);

/// 검증 전 Bearer 토큰 원문.
///
/// 서명과 종류 확인은 토큰을 넘겨받는 쪽이 합니다 (`POST /auth/refresh`).
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

/// JWT 인증 에러.
///
/// 메시지는 그대로 응답 본문의 `error` 필드가 됩니다.
#[derive(Debug, thiserror::Error)]
pub enum JwtAuthError {
    #[error("Token de autorización requerido")]
    MissingToken,
    #[error("Formato de cabecera Authorization inválido")]
    InvalidAuthHeader,
    #[error("El token ha expirado")]
    TokenExpired,
    #[error("Token inválido")]
    InvalidToken,
    #[error("Se requiere un token de tipo {expected}")]
    WrongTokenKind { expected: TokenKind },
}

impl JwtAuthError {
    /// HTTP 상태 코드와 에러 코드.
    ///
    /// 서명/형식 오류와 종류 불일치는 422, 토큰 누락과 만료는 401입니다.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            JwtAuthError::MissingToken => (StatusCode::UNAUTHORIZED, "MISSING_TOKEN"),
            JwtAuthError::InvalidAuthHeader => (StatusCode::UNAUTHORIZED, "INVALID_AUTH_HEADER"),
            JwtAuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
            JwtAuthError::InvalidToken => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_TOKEN"),
            JwtAuthError::WrongTokenKind { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "WRONG_TOKEN_KIND")
            }
        }
    }
}

impl From<JwtError> for JwtAuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::TokenExpired => JwtAuthError::TokenExpired,
            JwtError::TokenKindMismatch { expected, .. } => JwtAuthError::WrongTokenKind { expected },
            JwtError::TokenInvalid | JwtError::Encoding(_) => JwtAuthError::InvalidToken,
        }
    }
}

impl IntoResponse for JwtAuthError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = Json(json!({
            "error": self.to_string(),
            "code": code,
        }));

        (status, body).into_response()
    }
}

/// `Authorization: Bearer <token>` 헤더에서 토큰 추출.
fn bearer_token(parts: &Parts) -> Result<&str, JwtAuthError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(JwtAuthError::MissingToken)?
        .to_str()
        .map_err(|_| JwtAuthError::InvalidAuthHeader)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(JwtAuthError::InvalidAuthHeader)?
        .trim();

    if token.is_empty() {
        return Err(JwtAuthError::MissingToken);
    }

    Ok(token)
}

fn authenticate(parts: &Parts, state: &AppState) -> Result<Identity, JwtAuthError> {
    let token = bearer_token(parts)?;

    state.tokens.verify(token, TokenKind::Access).map_err(|e| {
        debug!(error = %e, "Access token rejected");
        JwtAuthError::from(e)
    })
}

impl FromRequestParts<Arc<AppState>> for JwtAuth {
    type Rejection = JwtAuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).map(JwtAuth)
    }
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = JwtAuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        bearer_token(parts).map(|token| BearerToken(token.to_string()))
    }
}
