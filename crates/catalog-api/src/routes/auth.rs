//! 인증 API 라우트.
//!
//! # 엔드포인트
//!
//! - `POST /auth/login` - 로그인 (토큰 쌍 발급)
//! - `POST /auth/register` - 회원 가입 (토큰 쌍 발급)
//! - `POST /auth/refresh` - Refresh Token으로 Access Token 재발급
//! - `GET /auth/me` - 현재 사용자 조회

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use catalog_core::{NewUser, UserProfile};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use utoipa::ToSchema;
use validator::Validate;

use super::required_text;
use crate::auth::{hash_password, verify_password, BearerToken, JwtAuth};
use crate::error::{ApiError, ApiErrorResponse, ApiJson, ApiResult};
use crate::repository::StoreError;
use crate::state::AppState;

const USER_NOT_FOUND: &str = "Usuario no encontrado";
const HANDLE_TAKEN: &str = "El número ya está registrado";

// ==================== Request/Response 타입 ====================

/// 로그인 요청.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// 사용자 식별자
    pub numero: Option<String>,
    /// 비밀번호
    pub contrasena: Option<String>,
}

/// 회원 가입 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(max = 50, message = "El número no puede superar 50 caracteres"))]
    pub numero: Option<String>,
    #[validate(length(max = 255, message = "El nombre no puede superar 255 caracteres"))]
    pub nombre: Option<String>,
    #[validate(length(max = 255, message = "El apellido no puede superar 255 caracteres"))]
    pub apellido: Option<String>,
    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres"))]
    pub contrasena: Option<String>,
}

/// 로그인/가입 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub access_token: String,
    pub refresh_token: String,
    pub usuario: UserProfile,
}

/// 토큰 재발급 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// 현재 사용자 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    pub message: String,
    pub usuario: UserProfile,
}

// ==================== 라우터 ====================

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/refresh", post(refresh))
        .route("/auth/me", get(me))
}

// ==================== 핸들러 ====================

/// 로그인
///
/// POST /auth/login
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = AuthResponse),
        (status = 400, description = "필수 필드 누락", body = ApiErrorResponse),
        (status = 401, description = "비밀번호 불일치", body = ApiErrorResponse),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let (Some(numero), Some(contrasena)) = (
        required_text(&request.numero),
        required_text(&request.contrasena),
    ) else {
        return Err(ApiError::validation("Número y contraseña son requeridos"));
    };

    let user = state
        .users
        .find_by_handle(numero)
        .await
        .map_err(ApiError::storage("Error al procesar el inicio de sesión"))?
        .ok_or_else(|| {
            debug!(numero, "Login for unknown handle");
            ApiError::not_found(USER_NOT_FOUND)
        })?;

    if !verify_password(contrasena, &user.password_hash) {
        warn!(user_id = user.id, "Login rejected: wrong password");
        return Err(ApiError::Unauthorized("Contraseña incorrecta".to_string()));
    }

    let tokens = state.tokens.issue_pair(user.id)?;

    info!(user_id = user.id, "User logged in");
    Ok(Json(AuthResponse {
        message: "Inicio de sesión exitoso".to_string(),
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        usuario: user.profile(),
    }))
}

/// 회원 가입
///
/// POST /auth/register
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "가입 성공", body = AuthResponse),
        (status = 400, description = "필수 필드 누락 또는 짧은 비밀번호", body = ApiErrorResponse),
        (status = 409, description = "이미 등록된 식별자", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let present = [
        &request.numero,
        &request.nombre,
        &request.apellido,
        &request.contrasena,
    ]
    .into_iter()
    .all(|field| required_text(field).is_some());
    if !present {
        return Err(ApiError::validation(
            "Número, nombre, apellido y contraseña son requeridos",
        ));
    }

    request.validate()?;

    let RegisterRequest {
        numero,
        nombre,
        apellido,
        contrasena,
    } = request;
    let handle = numero.unwrap_or_default();

    let existing = state
        .users
        .find_by_handle(&handle)
        .await
        .map_err(ApiError::storage("Error al registrar el usuario"))?;
    if existing.is_some() {
        return Err(ApiError::Conflict(HANDLE_TAKEN.to_string()));
    }

    let password_hash = hash_password(&contrasena.unwrap_or_default())?;

    let user = state
        .users
        .insert(NewUser {
            handle,
            given_name: nombre.unwrap_or_default(),
            family_name: apellido.unwrap_or_default(),
            password_hash,
        })
        .await
        .map_err(|e| match e {
            // 사전 확인과 삽입 사이의 경합
            StoreError::UniqueViolation(_) => ApiError::Conflict(HANDLE_TAKEN.to_string()),
            other => ApiError::storage("Error al registrar el usuario")(other),
        })?;

    let tokens = state.tokens.issue_pair(user.id)?;

    info!(user_id = user.id, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Usuario registrado exitosamente".to_string(),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            usuario: user.profile(),
        }),
    ))
}

/// Access Token 재발급
///
/// POST /auth/refresh
///
/// Refresh Token은 회전되지 않으며 만료 전까지 계속 사용할 수 있습니다.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, description = "재발급 성공", body = RefreshResponse),
        (status = 401, description = "토큰 누락 또는 만료", body = ApiErrorResponse),
        (status = 422, description = "잘못된 토큰 또는 Access Token 제시", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    BearerToken(token): BearerToken,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = state.tokens.refresh(&token).map_err(|e| {
        debug!(error = %e, "Refresh token rejected");
        ApiError::from(e)
    })?;

    debug!("Access token refreshed");
    Ok(Json(RefreshResponse { access_token }))
}

/// 현재 사용자 조회
///
/// GET /auth/me
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "사용자 정보", body = MeResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn me(
    State(state): State<Arc<AppState>>,
    JwtAuth(identity): JwtAuth,
) -> ApiResult<Json<MeResponse>> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await
        .map_err(ApiError::storage("Error al obtener el usuario"))?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;

    Ok(Json(MeResponse {
        message: "Usuario encontrado".to_string(),
        usuario: user.profile(),
    }))
}
