//! 카테고리/상품 테이블 매핑.

use catalog_core::{Category, CategoryFields, Product, ProductFields};
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::Postgres;

use super::{PgResource, Resource};

impl Resource for Category {
    type Fields = CategoryFields;

    const TABLE: &'static str = "categortia";

    fn assemble(id: i64, fields: CategoryFields) -> Self {
        fields.into_category(id)
    }
}

impl PgResource for Category {
    const COLUMNS: &'static [&'static str] = &["nombre"];

    fn bind_fields<'q>(
        query: QueryAs<'q, Postgres, Self, PgArguments>,
        fields: &'q CategoryFields,
    ) -> QueryAs<'q, Postgres, Self, PgArguments> {
        query.bind(&fields.name)
    }
}

impl Resource for Product {
    type Fields = ProductFields;

    const TABLE: &'static str = "producto";

    fn assemble(id: i64, fields: ProductFields) -> Self {
        fields.into_product(id)
    }
}

impl PgResource for Product {
    const COLUMNS: &'static [&'static str] = &["nombre", "precio", "descripcion", "categortia_id"];

    fn bind_fields<'q>(
        query: QueryAs<'q, Postgres, Self, PgArguments>,
        fields: &'q ProductFields,
    ) -> QueryAs<'q, Postgres, Self, PgArguments> {
        query
            .bind(&fields.name)
            .bind(fields.price)
            .bind(&fields.description)
            .bind(fields.category_id)
    }
}
