//! 참조 무결성 검사.
//!
//! 상품의 `categortia_id`가 실제 카테고리를 가리키는지 쓰기 직전에 확인합니다.
//! 저장소에는 외래 키 제약이 없으므로 이 검사가 유일한 보장입니다.
//!
//! 검사와 쓰기 사이에 카테고리가 삭제될 수 있습니다. 이 경우 상품은 존재하지 않는
//! 카테고리를 가리키게 되며, 이는 허용된 동작입니다.

use std::sync::Arc;

use catalog_core::Category;
use tracing::debug;

use crate::repository::{Repository, StoreError};

/// 참조 검사 에러.
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error("카테고리를 찾을 수 없습니다: {0}")]
    CategoryNotFound(i64),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// 상품 → 카테고리 참조 검사기.
#[derive(Clone)]
pub struct ReferentialGuard {
    categories: Arc<dyn Repository<Category>>,
}

impl ReferentialGuard {
    pub fn new(categories: Arc<dyn Repository<Category>>) -> Self {
        Self { categories }
    }

    /// 카테고리 존재 확인.
    pub async fn ensure_category_exists(&self, category_id: i64) -> Result<(), GuardError> {
        match self.categories.get(category_id).await? {
            Some(_) => Ok(()),
            None => {
                debug!(category_id, "Referenced category does not exist");
                Err(GuardError::CategoryNotFound(category_id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRepository;
    use catalog_core::CategoryFields;

    #[tokio::test]
    async fn test_existing_category_passes() {
        let categories = Arc::new(MemoryRepository::<Category>::new());
        let bebidas = categories
            .create(CategoryFields {
                name: "Bebidas".to_string(),
            })
            .await
            .unwrap();

        let guard = ReferentialGuard::new(categories);
        assert!(guard.ensure_category_exists(bebidas.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_category_rejected() {
        let guard = ReferentialGuard::new(Arc::new(MemoryRepository::<Category>::new()));

        assert!(matches!(
            guard.ensure_category_exists(9999).await,
            Err(GuardError::CategoryNotFound(9999))
        ));
    }

    #[tokio::test]
    async fn test_deleted_category_rejected() {
        let categories = Arc::new(MemoryRepository::<Category>::new());
        let snacks = categories
            .create(CategoryFields {
                name: "Snacks".to_string(),
            })
            .await
            .unwrap();
        categories.delete(snacks.id).await.unwrap();

        let guard = ReferentialGuard::new(categories);
        assert!(matches!(
            guard.ensure_category_exists(snacks.id).await,
            Err(GuardError::CategoryNotFound(_))
        ));
    }
}
