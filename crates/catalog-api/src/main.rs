//! 카탈로그 API 서버.
//!
//! 설정을 한 번 로드한 뒤 Axum 기반 REST API 서버를 시작합니다.

use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, Router};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use catalog_api::routes::create_api_router;
use catalog_api::state::{connect_pool, AppState};
use catalog_api::TokenService;
use catalog_core::{init_logging, AppConfig, LogConfig, StoreBackend};

/// 설정에 따라 저장소 백엔드를 선택하여 AppState 생성.
fn create_app_state(config: &AppConfig) -> AppState {
    let tokens = TokenService::from_config(&config.auth);

    match config.database.backend {
        StoreBackend::Postgres => {
            let pool = connect_pool(&config.database);
            info!(
                host = %config.database.host,
                port = config.database.port,
                database = %config.database.name,
                max_connections = config.database.max_connections,
                "PostgreSQL pool configured"
            );
            AppState::postgres(pool, tokens)
        }
        StoreBackend::Memory => {
            warn!("Using in-memory store, data will be lost on shutdown");
            AppState::in_memory(tokens)
        }
    }
}

/// CORS 레이어 생성 (모든 origin 허용).
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        // 허용되는 HTTP 메서드
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        // 허용되는 헤더
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        // preflight 요청 캐시 시간
        .max_age(Duration::from_secs(3600))
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>) -> Router {
    create_api_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초) - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(cors_layer())
}

/// OpenAPI 스펙 내보내기.
///
/// `--export-openapi` 플래그가 있으면 스펙을 stdout으로 출력하고 `true`를 반환합니다.
fn handle_export_openapi() -> Result<bool, Box<dyn std::error::Error>> {
    use catalog_api::openapi::ApiDoc;
    use utoipa::OpenApi as _;

    if !std::env::args().any(|arg| arg == "--export-openapi") {
        return Ok(false);
    }

    let json = serde_json::to_string_pretty(&ApiDoc::openapi())?;
    println!("{}", json);
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    if handle_export_openapi()? {
        return Ok(());
    }

    // 설정 로드 (기본값 → config/default.toml → CATALOG__* 환경변수)
    let config = AppConfig::load_default()?;

    init_logging(LogConfig::from(&config.logging))?;

    info!("Starting Catalog API server...");

    let addr = config.server.socket_addr().map_err(|e| {
        error!(
            host = %config.server.host,
            port = config.server.port,
            error = %e,
            "Invalid socket address, check CATALOG__SERVER__HOST and CATALOG__SERVER__PORT"
        );
        e
    })?;

    if config.auth.secret_generated {
        warn!(
            "CATALOG__AUTH__SECRET_KEY not set, generated a random signing key; \
             tokens issued before a restart will be rejected"
        );
    }

    let state = Arc::new(create_app_state(&config));
    info!(
        version = %state.version,
        backend = ?config.database.backend,
        access_token_minutes = config.auth.access_token_minutes,
        "Application state initialized"
    );

    let app = create_router(state);

    info!(%addr, "API server listening");
    info!("OpenAPI document at http://{}/documentacion/swagger.json", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 반환합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
