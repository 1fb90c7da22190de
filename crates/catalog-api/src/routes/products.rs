//! 상품 API 라우트.
//!
//! # 엔드포인트
//!
//! - `GET /productos/` - 전체 목록 (공개)
//! - `GET /productos/{id}` - 단건 조회 (공개)
//! - `POST /productos/` - 생성 (인증, 카테고리 존재 확인)
//! - `PUT /productos/{id}` - 전체 수정 (인증, 카테고리 존재 확인)
//! - `DELETE /productos/{id}` - 삭제 (인증)

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use catalog_core::{Product, ProductFields};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};
use utoipa::ToSchema;
use validator::Validate;

use super::{required_text, DeletedResponse};
use crate::auth::JwtAuth;
use crate::error::{ApiError, ApiErrorResponse, ApiJson, ApiPath, ApiResult};
use crate::state::AppState;

const NOT_FOUND_MESSAGE: &str = "Producto no encontrado";

/// `producto.precio NUMERIC(10, 2)`: 소수 둘째 자리까지, 정수부 8자리.
const PRICE_MAX_SCALE: u32 = 2;
const PRICE_LIMIT: u32 = 100_000_000;

// ==================== Request 타입 ====================

/// 상품 생성/수정 요청.
///
/// `precio`와 `categortia_id`는 0이면 누락으로 취급합니다.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProductRequest {
    /// 상품 이름 (필수)
    #[validate(length(max = 255, message = "El nombre no puede superar 255 caracteres"))]
    pub nombre: Option<String>,
    /// 가격 (필수, 0 초과, 소수 둘째 자리까지)
    #[schema(value_type = Option<f64>)]
    pub precio: Option<Decimal>,
    /// 설명
    #[validate(length(max = 1000, message = "La descripción no puede superar 1000 caracteres"))]
    pub descripcion: Option<String>,
    /// 카테고리 ID (필수)
    pub categortia_id: Option<i64>,
}

impl ProductRequest {
    /// 필수 필드 확인 후 형식 검증.
    pub fn into_fields(self) -> ApiResult<ProductFields> {
        let price = self.precio.filter(|p| !p.is_zero());
        let category_id = self.categortia_id.filter(|id| *id != 0);

        let (Some(price), Some(category_id)) = (price, category_id) else {
            return Err(ApiError::validation(
                "Nombre, precio y categortia_id son requeridos",
            ));
        };
        if required_text(&self.nombre).is_none() {
            return Err(ApiError::validation(
                "Nombre, precio y categortia_id son requeridos",
            ));
        }

        self.validate()?;

        if price.is_sign_negative() {
            return Err(ApiError::validation("El precio no puede ser negativo"));
        }
        if price.normalize().scale() > PRICE_MAX_SCALE {
            return Err(ApiError::validation(
                "El precio admite como máximo 2 decimales",
            ));
        }
        if price >= Decimal::from(PRICE_LIMIT) {
            return Err(ApiError::validation(
                "El precio debe ser menor que 100000000",
            ));
        }

        Ok(ProductFields {
            name: self.nombre.unwrap_or_default(),
            price,
            description: self.descripcion,
            category_id,
        })
    }
}

// ==================== 라우터 ====================

/// 상품 라우터 생성.
///
/// 목록/생성은 `/productos`와 `/productos/` 모두에서 받습니다.
pub fn products_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/productos", get(list_products).post(create_product))
        .route("/productos/", get(list_products).post(create_product))
        .route(
            "/productos/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

// ==================== 핸들러 ====================

/// 상품 목록
///
/// GET /productos/
#[utoipa::path(
    get,
    path = "/productos/",
    responses(
        (status = 200, description = "상품 목록", body = Vec<Product>),
        (status = 500, description = "서버 오류", body = ApiErrorResponse)
    ),
    tag = "productos"
)]
pub async fn list_products(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Product>>> {
    let products = state
        .products
        .list()
        .await
        .map_err(ApiError::storage("Error al obtener los productos"))?;

    debug!(count = products.len(), "Listed products");
    Ok(Json(products))
}

/// 상품 단건 조회
///
/// GET /productos/{id}
#[utoipa::path(
    get,
    path = "/productos/{id}",
    params(("id" = i64, Path, description = "상품 ID")),
    responses(
        (status = 200, description = "상품", body = Product),
        (status = 404, description = "없음", body = ApiErrorResponse)
    ),
    tag = "productos"
)]
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Product>> {
    state
        .products
        .get(id)
        .await
        .map_err(ApiError::storage("Error al obtener el producto"))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND_MESSAGE))
}

/// 상품 생성
///
/// POST /productos/
///
/// 카테고리가 없으면 404 (`CATEGORY_NOT_FOUND`)이며 아무것도 저장되지 않습니다.
#[utoipa::path(
    post,
    path = "/productos/",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "생성됨", body = Product),
        (status = 400, description = "필수 필드 누락", body = ApiErrorResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 404, description = "카테고리 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "productos"
)]
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    JwtAuth(identity): JwtAuth,
    ApiJson(request): ApiJson<ProductRequest>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let fields = request.into_fields()?;

    state.guard.ensure_category_exists(fields.category_id).await?;

    let product = state
        .products
        .create(fields)
        .await
        .map_err(ApiError::storage("Error al crear el producto"))?;

    info!(
        user_id = identity.user_id,
        product_id = product.id,
        category_id = product.category_id,
        "Product created"
    );
    Ok((StatusCode::CREATED, Json(product)))
}

/// 상품 수정 (전체 교체)
///
/// PUT /productos/{id}
///
/// 카테고리 확인이 상품 존재 확인보다 먼저 수행됩니다.
#[utoipa::path(
    put,
    path = "/productos/{id}",
    params(("id" = i64, Path, description = "상품 ID")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "수정됨", body = Product),
        (status = 400, description = "필수 필드 누락", body = ApiErrorResponse),
        (status = 404, description = "상품 또는 카테고리 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "productos"
)]
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    JwtAuth(identity): JwtAuth,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<ProductRequest>,
) -> ApiResult<Json<Product>> {
    let fields = request.into_fields()?;

    state.guard.ensure_category_exists(fields.category_id).await?;

    let product = state
        .products
        .update(id, fields)
        .await
        .map_err(ApiError::storage("Error al actualizar el producto"))?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND_MESSAGE))?;

    info!(user_id = identity.user_id, product_id = id, "Product updated");
    Ok(Json(product))
}

/// 상품 삭제
///
/// DELETE /productos/{id}
#[utoipa::path(
    delete,
    path = "/productos/{id}",
    params(("id" = i64, Path, description = "상품 ID")),
    responses(
        (status = 200, description = "삭제됨", body = DeletedResponse),
        (status = 404, description = "없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "productos"
)]
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    JwtAuth(identity): JwtAuth,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    let deleted = state
        .products
        .delete(id)
        .await
        .map_err(ApiError::storage("Error al eliminar el producto"))?;

    if !deleted {
        return Err(ApiError::not_found(NOT_FOUND_MESSAGE));
    }

    info!(user_id = identity.user_id, product_id = id, "Product deleted");
    Ok(Json(DeletedResponse::new("Producto eliminado", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_test_state;
    use axum::body::Body;
    use axum::http::{header, Request};
    use catalog_core::CategoryFields;
    use rust_decimal_macros::dec;
    use tower::ServiceExt;

    const REQUIRED_MESSAGE: &str = "Nombre, precio y categortia_id son requeridos";

    fn request(nombre: Option<&str>, precio: Option<Decimal>, categortia_id: Option<i64>) -> ProductRequest {
        ProductRequest {
            nombre: nombre.map(str::to_string),
            precio,
            descripcion: None,
            categortia_id,
        }
    }

    /// 카테고리 하나가 있는 상태와 Access Token.
    async fn setup() -> (Arc<AppState>, Router, String, i64) {
        let state = Arc::new(create_test_state());
        let category = state
            .categories
            .create(CategoryFields {
                name: "Bebidas".to_string(),
            })
            .await
            .unwrap();
        let token = state.tokens.issue_access(1).unwrap();
        let app = products_router().with_state(Arc::clone(&state));
        (state, app, token, category.id)
    }

    fn json_request(method: &str, uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_falsy_values_are_missing() {
        for req in [
            request(None, Some(dec!(10)), Some(1)),
            request(Some(""), Some(dec!(10)), Some(1)),
            request(Some("Cola"), None, Some(1)),
            request(Some("Cola"), Some(dec!(0)), Some(1)),
            request(Some("Cola"), Some(dec!(10)), None),
            request(Some("Cola"), Some(dec!(10)), Some(0)),
        ] {
            let err = req.into_fields().unwrap_err();
            assert_eq!(err.to_string(), REQUIRED_MESSAGE);
        }
    }

    #[test]
    fn test_negative_price_rejected() {
        let err = request(Some("Cola"), Some(dec!(-1.5)), Some(1))
            .into_fields()
            .unwrap_err();
        assert_eq!(err.to_string(), "El precio no puede ser negativo");
    }

    #[test]
    fn test_price_must_fit_column() {
        let err = request(Some("Cola"), Some(dec!(1000000000)), Some(1))
            .into_fields()
            .unwrap_err();
        assert_eq!(err.to_string(), "El precio debe ser menor que 100000000");

        let err = request(Some("Cola"), Some(dec!(100000000)), Some(1))
            .into_fields()
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        // 저장 시 0.00으로 반올림되는 값
        let err = request(Some("Cola"), Some(dec!(0.001)), Some(1))
            .into_fields()
            .unwrap_err();
        assert_eq!(err.to_string(), "El precio admite como máximo 2 decimales");

        let fields = request(Some("Cola"), Some(dec!(99999999.99)), Some(1))
            .into_fields()
            .unwrap();
        assert_eq!(fields.price, dec!(99999999.99));

        // 뒤따르는 0은 정밀도로 보지 않음
        let fields = request(Some("Cola"), Some(dec!(1.500)), Some(1))
            .into_fields()
            .unwrap();
        assert_eq!(fields.price, dec!(1.5));
    }

    #[tokio::test]
    async fn test_oversized_price_is_bad_request() {
        let (state, app, token, category_id) = setup().await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/productos/",
                &token,
                serde_json::json!({"nombre": "Cola", "precio": 1000000000, "categortia_id": category_id}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
        assert!(state.products.list().await.unwrap().is_empty());
    }

    #[test]
    fn test_valid_request() {
        let fields = request(Some("Cola"), Some(dec!(10.5)), Some(3))
            .into_fields()
            .unwrap();
        assert_eq!(fields.price, dec!(10.5));
        assert_eq!(fields.category_id, 3);
        assert!(fields.description.is_none());
    }

    #[tokio::test]
    async fn test_create_with_missing_category_writes_nothing() {
        let (state, app, token, _) = setup().await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/productos/",
                &token,
                serde_json::json!({"nombre": "Cola", "precio": 10.5, "categortia_id": 9999}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Categoría no encontrada");
        assert!(state.products.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_product() {
        let (_, app, token, category_id) = setup().await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/productos/",
                &token,
                serde_json::json!({
                    "nombre": "Cola",
                    "precio": 10.5,
                    "descripcion": "Lata 350ml",
                    "categortia_id": category_id
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["nombre"], "Cola");
        assert_eq!(body["precio"], 10.5);
        assert_eq!(body["descripcion"], "Lata 350ml");
        assert_eq!(body["categortia_id"], category_id);
    }

    #[tokio::test]
    async fn test_update_checks_category_before_product() {
        let (_, app, token, _) = setup().await;

        // 상품도 카테고리도 없으면 카테고리 에러가 먼저
        let response = app
            .oneshot(json_request(
                "PUT",
                "/productos/77",
                &token,
                serde_json::json!({"nombre": "Cola", "precio": 1, "categortia_id": 9999}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], "CATEGORY_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let (_, app, token, category_id) = setup().await;

        let response = app
            .oneshot(json_request(
                "PUT",
                "/productos/77",
                &token,
                serde_json::json!({"nombre": "Cola", "precio": 1, "categortia_id": category_id}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn test_update_replaces_all_fields() {
        let (state, app, token, category_id) = setup().await;
        let product = state
            .products
            .create(ProductFields {
                name: "Cola".to_string(),
                price: dec!(10),
                description: Some("Lata".to_string()),
                category_id,
            })
            .await
            .unwrap();

        let response = app
            .oneshot(json_request(
                "PUT",
                &format!("/productos/{}", product.id),
                &token,
                serde_json::json!({"nombre": "Cola Zero", "precio": 12, "categortia_id": category_id}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["nombre"], "Cola Zero");
        assert!(body["descripcion"].is_null());
    }

    #[tokio::test]
    async fn test_list_is_public() {
        let (_, app, _, _) = setup().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/productos")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }
}
