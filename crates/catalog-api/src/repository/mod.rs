//! 저장소 계층.
//!
//! 데이터베이스 접근 로직을 라우트 핸들러에서 분리하여 관리합니다.
//!
//! - [`Repository`]: 테이블 하나에 대한 범용 CRUD (카테고리, 상품 공용)
//! - [`UserStore`]: 사용자 자격증명 저장소
//!
//! 구현은 PostgreSQL([`postgres`])과 인메모리([`memory`]) 두 가지이며,
//! `AppState`는 트레이트 객체로만 접근합니다.

pub mod catalog;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use catalog_core::{NewUser, User};

pub use memory::{MemoryRepository, MemoryUserStore};
pub use postgres::{PgRepository, PgResource, PgUserStore};

/// 저장소 에러.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("고유 제약 위반: {0}")]
    UniqueViolation(String),
    #[error("데이터베이스 오류: {0}")]
    Database(sqlx::Error),
    #[error("저장소를 사용할 수 없습니다: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unique").to_string();
                return StoreError::UniqueViolation(constraint);
            }
        }

        match err {
            sqlx::Error::PoolTimedOut => {
                StoreError::Unavailable("connection pool timed out".to_string())
            }
            sqlx::Error::PoolClosed => StoreError::Unavailable("connection pool closed".to_string()),
            other => StoreError::Database(other),
        }
    }
}

/// 저장소가 다루는 레코드 타입.
///
/// 레코드는 대리 키(`id`)와 나머지 전체 필드(`Fields`)로 구성됩니다.
pub trait Resource: Clone + Send + Sync + 'static {
    /// id를 제외한 전체 필드
    type Fields: Clone + Send + Sync + 'static;

    /// 테이블 이름
    const TABLE: &'static str;

    fn assemble(id: i64, fields: Self::Fields) -> Self;
}

/// 범용 CRUD 저장소.
///
/// 모든 연산은 단일 행 단위로 원자적입니다. 행 간 트랜잭션은 없습니다.
#[async_trait]
pub trait Repository<R: Resource>: Send + Sync {
    /// 전체 목록 (필터 없음, id 순).
    async fn list(&self) -> Result<Vec<R>, StoreError>;

    /// 단건 조회.
    async fn get(&self, id: i64) -> Result<Option<R>, StoreError>;

    /// 생성. 대리 키는 저장소가 발급합니다.
    async fn create(&self, fields: R::Fields) -> Result<R, StoreError>;

    /// 전체 필드 교체. 대상이 없으면 `None`.
    async fn update(&self, id: i64, fields: R::Fields) -> Result<Option<R>, StoreError>;

    /// 삭제. 대상이 없으면 `false`.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

/// 사용자 자격증명 저장소.
///
/// 사용자는 등록으로만 생성되며 수정/삭제되지 않습니다.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_handle(&self, handle: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// 신규 사용자 저장.
    ///
    /// # Errors
    ///
    /// 같은 handle이 이미 있으면 [`StoreError::UniqueViolation`].
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;
}
