//! 인메모리 저장소 구현.
//!
//! 개발 및 테스트용. 프로세스가 종료되면 데이터는 사라집니다.

use std::collections::BTreeMap;

use async_trait::async_trait;
use catalog_core::{NewUser, User};
use tokio::sync::RwLock;

use super::{Repository, Resource, StoreError, UserStore};

/// id 순으로 정렬된 행과 다음 대리 키.
struct Table<R> {
    rows: BTreeMap<i64, R>,
    next_id: i64,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<R> Table<R> {
    /// 삭제된 id는 재사용하지 않습니다 (BIGSERIAL과 동일).
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// 인메모리 범용 저장소.
pub struct MemoryRepository<R> {
    table: RwLock<Table<R>>,
}

impl<R> MemoryRepository<R> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table::default()),
        }
    }
}

impl<R> Default for MemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Resource> Repository<R> for MemoryRepository<R> {
    async fn list(&self) -> Result<Vec<R>, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<R>, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn create(&self, fields: R::Fields) -> Result<R, StoreError> {
        let mut table = self.table.write().await;
        let id = table.allocate_id();
        let record = R::assemble(id, fields);
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: i64, fields: R::Fields) -> Result<Option<R>, StoreError> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&id) {
            Some(row) => {
                *row = R::assemble(id, fields);
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut table = self.table.write().await;
        Ok(table.rows.remove(&id).is_some())
    }
}

/// 인메모리 사용자 저장소.
#[derive(Default)]
pub struct MemoryUserStore {
    table: RwLock<Table<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_handle(&self, handle: &str) -> Result<Option<User>, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| u.handle == handle).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut table = self.table.write().await;
        if table.rows.values().any(|u| u.handle == user.handle) {
            return Err(StoreError::UniqueViolation("usuario_numero_key".to_string()));
        }

        let id = table.allocate_id();
        let created = user.into_user(id);
        table.rows.insert(id, created.clone());
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::{Category, CategoryFields};

    fn fields(name: &str) -> CategoryFields {
        CategoryFields {
            name: name.to_string(),
        }
    }

    fn new_user(handle: &str) -> NewUser {
        NewUser {
            handle: handle.to_string(),
            given_name: "Ana".to_string(),
            family_name: "Gomez".to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_crud_cycle() {
        let repo = MemoryRepository::<Category>::new();

        let created = repo.create(fields("Bebidas")).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(repo.get(1).await.unwrap(), Some(created));

        let updated = repo.update(1, fields("Snacks")).await.unwrap().unwrap();
        assert_eq!(updated.name, "Snacks");
        assert_eq!(repo.list().await.unwrap(), vec![updated]);

        assert!(repo.delete(1).await.unwrap());
        assert!(!repo.delete(1).await.unwrap());
        assert!(repo.get(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let repo = MemoryRepository::<Category>::new();
        assert!(repo.update(42, fields("X")).await.unwrap().is_none());
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ids_are_not_reused() {
        let repo = MemoryRepository::<Category>::new();
        let first = repo.create(fields("A")).await.unwrap();
        repo.delete(first.id).await.unwrap();

        let second = repo.create(fields("B")).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let repo = MemoryRepository::<Category>::new();
        for name in ["C", "A", "B"] {
            repo.create(fields(name)).await.unwrap();
        }

        let ids: Vec<i64> = repo.list().await.unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_user_handle_is_unique() {
        let users = MemoryUserStore::new();
        let ana = users.insert(new_user("555")).await.unwrap();

        assert!(matches!(
            users.insert(new_user("555")).await,
            Err(StoreError::UniqueViolation(_))
        ));
        assert_eq!(users.find_by_handle("555").await.unwrap().unwrap().id, ana.id);
        assert_eq!(users.find_by_id(ana.id).await.unwrap().unwrap().handle, "555");
        assert!(users.find_by_handle("556").await.unwrap().is_none());
    }
}
