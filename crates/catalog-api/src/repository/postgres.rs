//! PostgreSQL 저장소 구현.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use catalog_core::{NewUser, User};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, PgPool, Postgres};

use super::{Repository, Resource, StoreError, UserStore};

/// PostgreSQL 테이블에 매핑되는 레코드.
pub trait PgResource: Resource + for<'r> FromRow<'r, PgRow> + Unpin {
    /// `id`를 제외한 컬럼 (바인딩 순서와 동일)
    const COLUMNS: &'static [&'static str];

    /// `COLUMNS` 순서대로 필드 값을 바인딩합니다.
    fn bind_fields<'q>(
        query: QueryAs<'q, Postgres, Self, PgArguments>,
        fields: &'q Self::Fields,
    ) -> QueryAs<'q, Postgres, Self, PgArguments>;
}

/// 테이블별로 미리 생성한 SQL 문.
#[derive(Debug)]
struct Statements {
    select_all: String,
    select_one: String,
    insert: String,
    update: String,
    delete: String,
}

impl Statements {
    fn build(table: &str, columns: &[&str]) -> Self {
        let column_list = columns.join(", ");
        let returning = format!("id, {column_list}");
        let placeholders = (1..=columns.len())
            .map(|i| format!("${i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let assignments = columns
            .iter()
            .enumerate()
            .map(|(i, col)| format!("{col} = ${}", i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let id_param = columns.len() + 1;

        Self {
            select_all: format!("SELECT {returning} FROM {table} ORDER BY id"),
            select_one: format!("SELECT {returning} FROM {table} WHERE id = $1"),
            insert: format!(
                "INSERT INTO {table} ({column_list}) VALUES ({placeholders}) RETURNING {returning}"
            ),
            update: format!(
                "UPDATE {table} SET {assignments} WHERE id = ${id_param} RETURNING {returning}"
            ),
            delete: format!("DELETE FROM {table} WHERE id = $1"),
        }
    }
}

/// PostgreSQL 범용 저장소.
pub struct PgRepository<R> {
    pool: PgPool,
    statements: Arc<Statements>,
    _marker: PhantomData<fn() -> R>,
}

impl<R: PgResource> PgRepository<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            statements: Arc::new(Statements::build(R::TABLE, R::COLUMNS)),
            _marker: PhantomData,
        }
    }
}

impl<R> Clone for PgRepository<R> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            statements: Arc::clone(&self.statements),
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<R: PgResource> Repository<R> for PgRepository<R> {
    async fn list(&self) -> Result<Vec<R>, StoreError> {
        let rows = sqlx::query_as::<_, R>(&self.statements.select_all)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get(&self, id: i64) -> Result<Option<R>, StoreError> {
        let row = sqlx::query_as::<_, R>(&self.statements.select_one)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create(&self, fields: R::Fields) -> Result<R, StoreError> {
        let query = sqlx::query_as::<_, R>(&self.statements.insert);
        let row = R::bind_fields(query, &fields)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, id: i64, fields: R::Fields) -> Result<Option<R>, StoreError> {
        let query = sqlx::query_as::<_, R>(&self.statements.update);
        let row = R::bind_fields(query, &fields)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query(&self.statements.delete)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// PostgreSQL 사용자 저장소 (`usuario` 테이블).
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_handle(&self, handle: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, numero, nombre, apellido, contrasena
            FROM usuario
            WHERE numero = $1
            "#,
        )
        .bind(handle)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, numero, nombre, apellido, contrasena
            FROM usuario
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO usuario (numero, nombre, apellido, contrasena)
            VALUES ($1, $2, $3, $4)
            RETURNING id, numero, nombre, apellido, contrasena
            "#,
        )
        .bind(&user.handle)
        .bind(&user.given_name)
        .bind(&user.family_name)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }
}
