//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 시작 시 한 번 구성되며 이후 변경되지 않습니다.
//! Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다.

use std::sync::Arc;
use std::time::Duration;

use catalog_core::{Category, DatabaseConfig, Product};
use secrecy::ExposeSecret;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::auth::TokenService;
use crate::guard::ReferentialGuard;
use crate::repository::{
    MemoryRepository, MemoryUserStore, PgRepository, PgUserStore, Repository, UserStore,
};

/// 애플리케이션 공유 상태.
///
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 카테고리 저장소
    pub categories: Arc<dyn Repository<Category>>,

    /// 상품 저장소
    pub products: Arc<dyn Repository<Product>>,

    /// 사용자 자격증명 저장소
    pub users: Arc<dyn UserStore>,

    /// 토큰 발급/검증 서비스
    pub tokens: TokenService,

    /// 상품 → 카테고리 참조 검사기
    pub guard: ReferentialGuard,

    /// 데이터베이스 연결 풀 (PostgreSQL 백엔드에서만 존재)
    pub db_pool: Option<PgPool>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    fn assemble(
        categories: Arc<dyn Repository<Category>>,
        products: Arc<dyn Repository<Product>>,
        users: Arc<dyn UserStore>,
        tokens: TokenService,
        db_pool: Option<PgPool>,
    ) -> Self {
        Self {
            guard: ReferentialGuard::new(Arc::clone(&categories)),
            categories,
            products,
            users,
            tokens,
            db_pool,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// PostgreSQL 백엔드 상태 생성.
    pub fn postgres(pool: PgPool, tokens: TokenService) -> Self {
        Self::assemble(
            Arc::new(PgRepository::<Category>::new(pool.clone())),
            Arc::new(PgRepository::<Product>::new(pool.clone())),
            Arc::new(PgUserStore::new(pool.clone())),
            tokens,
            Some(pool),
        )
    }

    /// 인메모리 백엔드 상태 생성.
    pub fn in_memory(tokens: TokenService) -> Self {
        Self::assemble(
            Arc::new(MemoryRepository::<Category>::new()),
            Arc::new(MemoryRepository::<Product>::new()),
            Arc::new(MemoryUserStore::new()),
            tokens,
            None,
        )
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 저장소 연결 상태 확인.
    ///
    /// 인메모리 백엔드는 항상 정상입니다.
    pub async fn is_store_healthy(&self) -> bool {
        match &self.db_pool {
            Some(pool) => sqlx::query("SELECT 1").fetch_one(pool).await.is_ok(),
            None => true,
        }
    }
}

/// PostgreSQL 연결 풀 생성.
///
/// 연결은 지연 생성되므로 데이터베이스가 아직 준비되지 않아도 서버는 시작됩니다.
pub fn connect_pool(config: &DatabaseConfig) -> PgPool {
    let options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(config.password.expose_secret())
        .database(&config.name);

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_lazy_with(options)
}

/// 테스트용 AppState 생성 (인메모리 백엔드, 고정 서명 키).
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    AppState::in_memory(TokenService::new(b"test-secret-key-for-catalog-api", 15))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_state_is_healthy() {
        let state = create_test_state();
        assert!(state.db_pool.is_none());
        assert!(state.is_store_healthy().await);
        assert!(state.uptime_secs() >= 0);
    }

    #[tokio::test]
    async fn test_guard_shares_category_store() {
        use catalog_core::CategoryFields;

        let state = create_test_state();
        let created = state
            .categories
            .create(CategoryFields {
                name: "Bebidas".to_string(),
            })
            .await
            .unwrap();

        assert!(state.guard.ensure_category_exists(created.id).await.is_ok());
    }
}
